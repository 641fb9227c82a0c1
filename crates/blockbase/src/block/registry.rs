//! Per-render registry of blocks and their generation chains.

use std::collections::HashMap;

use crate::content::Content;
use crate::error::BlockError;
use crate::filter::pipeline::{self, ResolvedFilter};

/// Where a block's single slot was inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotAnchor {
    /// Index of the frame that first encountered the block.
    pub frame: usize,
    /// The enclosing block whose buffer holds the slot, or `None` for the
    /// frame's top-level stream.
    pub parent: Option<String>,
}

/// One definition of a block.
#[derive(Debug, Clone)]
pub struct Generation {
    sequence: usize,
    frame: usize,
    filters: Vec<ResolvedFilter>,
    raw: Content,
    resolved: Option<Content>,
}

impl Generation {
    /// Creation order within the block, starting at 0.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    /// Index of the frame that defined this generation.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Names (or labels) of the filters declared on this generation.
    pub fn filter_labels(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.label.as_str()).collect()
    }

    /// Content captured while the generation was open, before filtering.
    pub fn raw(&self) -> &Content {
        &self.raw
    }

    /// Content after filters, available once the generation is closed.
    pub fn resolved(&self) -> Option<&Content> {
        self.resolved.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.resolved.is_none()
    }
}

/// A block name with its slot anchor and every generation recorded for it.
#[derive(Debug, Clone)]
pub struct BlockEntry {
    anchor: SlotAnchor,
    generations: Vec<Generation>,
}

impl BlockEntry {
    pub fn anchor(&self) -> &SlotAnchor {
        &self.anchor
    }

    pub fn generations(&self) -> &[Generation] {
        &self.generations
    }

    /// The most recent generation.
    pub fn current(&self) -> Option<&Generation> {
        self.generations.last()
    }

    /// What the block's slot resolves to: the last generation's resolved content.
    pub fn final_content(&self) -> Option<&Content> {
        self.current().and_then(Generation::resolved)
    }
}

/// Maps block names to their entries.
///
/// Names share one namespace per render regardless of nesting depth. Entries
/// are created on first encounter and never removed; generations are only
/// ever appended.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    entries: HashMap<String, BlockEntry>,
    order: Vec<String>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&BlockEntry> {
        self.entries.get(name)
    }

    /// Block names in the order they were first encountered.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Final content of `name`, if it exists and its last generation is closed.
    pub fn final_content(&self, name: &str) -> Option<&Content> {
        self.entries.get(name).and_then(BlockEntry::final_content)
    }

    /// Appends an open generation of `name`, creating the block first if this
    /// is its first occurrence.
    ///
    /// `anchor` describes where this opening happens. It becomes the block's
    /// anchor only when the block is new; an existing anchor never moves.
    /// Returns whether the block was created and the new generation's
    /// sequence index.
    pub(crate) fn open_generation(
        &mut self,
        name: &str,
        anchor: SlotAnchor,
        filters: Vec<ResolvedFilter>,
    ) -> (bool, usize) {
        let frame = anchor.frame;
        let created = !self.entries.contains_key(name);
        if created {
            self.order.push(name.to_string());
        }
        let entry = self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| BlockEntry {
                anchor,
                generations: Vec::new(),
            });
        let sequence = entry.generations.len();
        entry.generations.push(Generation {
            sequence,
            frame,
            filters,
            raw: Content::new(),
            resolved: None,
        });
        (created, sequence)
    }

    /// Closes the current generation of `name`: stores the captured content and
    /// runs the generation's filters over it, exactly once.
    pub(crate) fn close(&mut self, name: &str, raw: Content) -> Result<&Content, BlockError> {
        let generation = self
            .entries
            .get_mut(name)
            .and_then(|entry| entry.generations.last_mut())
            .filter(|generation| generation.is_open())
            .ok_or_else(|| BlockError::UnmatchedEndBlock {
                expected: None,
                found: Some(name.to_string()),
            })?;

        let resolved = pipeline::apply(&generation.filters, &raw, name)?;
        generation.raw = raw;
        Ok(&*generation.resolved.insert(resolved))
    }

    /// Resolved content of the generation preceding the current one.
    pub(crate) fn super_content(&self, name: &str) -> Result<&Content, BlockError> {
        let generations = self
            .entries
            .get(name)
            .map(|entry| entry.generations.as_slice())
            .unwrap_or_default();

        match generations {
            [.., previous, _current] => {
                previous
                    .resolved()
                    .ok_or_else(|| BlockError::BlockAlreadyOpen {
                        block: name.to_string(),
                    })
            }
            _ => Err(BlockError::NoSuperGeneration {
                block: name.to_string(),
            }),
        }
    }
}
