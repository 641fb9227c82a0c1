//! Applying a generation's filters at close time.
//!
//! Filters see the generation's content as one string. Slots of nested blocks
//! are encoded as private-use sentinels (`U+E000 <index> U+E001`) before the
//! first filter runs and decoded back into slots after each filter. Every
//! sentinel must survive each filter exactly once; otherwise the nested
//! block would vanish or appear twice, and the render fails with
//! [`BlockError::CorruptedSlot`].
//!
//! A literal `U+E000` in captured text is escaped as `U+E000 U+E001` (no
//! index), so authored text can never be mistaken for a slot.

use super::{FilterFn, FilterRef, FilterRegistry, FilterSpec};
use crate::content::{Content, Segment};
use crate::error::BlockError;

const SLOT_OPEN: char = '\u{E000}';
const SLOT_CLOSE: char = '\u{E001}';

/// A filter resolved against the registry, ready to run.
#[derive(Clone)]
pub(crate) struct ResolvedFilter {
    pub(crate) label: String,
    transform: FilterFn,
}

impl std::fmt::Debug for ResolvedFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label)
    }
}

/// Resolves every named filter in `spec`, failing on the first unknown name.
pub(crate) fn resolve(
    spec: &FilterSpec,
    registry: &FilterRegistry,
    block: &str,
) -> Result<Vec<ResolvedFilter>, BlockError> {
    spec.filters()
        .iter()
        .map(|filter| match filter {
            FilterRef::Named(name) => registry
                .get(name)
                .map(|transform| ResolvedFilter {
                    label: name.clone(),
                    transform,
                })
                .ok_or_else(|| BlockError::UnknownFilter {
                    filter: name.clone(),
                    block: block.to_string(),
                }),
            FilterRef::Inline { label, transform } => Ok(ResolvedFilter {
                label: label.clone(),
                transform: transform.clone(),
            }),
        })
        .collect()
}

/// Runs `filters` left to right over `raw`.
pub(crate) fn apply(
    filters: &[ResolvedFilter],
    raw: &Content,
    block: &str,
) -> Result<Content, BlockError> {
    if filters.is_empty() {
        return Ok(raw.clone());
    }

    if let Some(text) = raw.as_literal() {
        let filtered = filters
            .iter()
            .fold(text.to_string(), |acc, filter| (filter.transform)(&acc));
        return Ok(Content::from(filtered));
    }

    let (mut text, slots) = encode(raw);
    for filter in filters {
        text = (filter.transform)(&text);
        if decode(&text, &slots).is_none() {
            return Err(BlockError::CorruptedSlot {
                block: block.to_string(),
                filter: filter.label.clone(),
            });
        }
    }
    decode(&text, &slots).ok_or_else(|| BlockError::CorruptedSlot {
        block: block.to_string(),
        filter: filters
            .last()
            .map(|f| f.label.clone())
            .unwrap_or_default(),
    })
}

fn encode(content: &Content) -> (String, Vec<String>) {
    let mut text = String::new();
    let mut slots = Vec::new();
    for segment in content.segments() {
        match segment {
            Segment::Text(t) => {
                for ch in t.chars() {
                    text.push(ch);
                    if ch == SLOT_OPEN {
                        text.push(SLOT_CLOSE);
                    }
                }
            }
            Segment::Slot(name) => {
                text.push(SLOT_OPEN);
                text.push_str(&slots.len().to_string());
                text.push(SLOT_CLOSE);
                slots.push(name.clone());
            }
        }
    }
    (text, slots)
}

/// Decodes sentinels back into slots; `None` unless each slot appears once.
fn decode(text: &str, slots: &[String]) -> Option<Content> {
    let mut content = Content::new();
    let mut seen = vec![0usize; slots.len()];
    let mut rest = text;

    while let Some(start) = rest.find(SLOT_OPEN) {
        content.push_str(&rest[..start]);
        let after = &rest[start + SLOT_OPEN.len_utf8()..];
        if let Some(escaped) = after.strip_prefix(SLOT_CLOSE) {
            content.push_str(&rest[start..start + SLOT_OPEN.len_utf8()]);
            rest = escaped;
            continue;
        }
        let index = after
            .find(SLOT_CLOSE)
            .and_then(|end| after[..end].parse::<usize>().ok().map(|i| (i, end)))
            .filter(|(i, _)| *i < slots.len());

        match index {
            Some((i, end)) => {
                seen[i] += 1;
                content.push_slot(slots[i].clone());
                rest = &after[end + SLOT_CLOSE.len_utf8()..];
            }
            None => {
                // Stray sentinel introduced by a filter.
                content.push_str(&rest[start..start + SLOT_OPEN.len_utf8()]);
                rest = after;
            }
        }
    }
    content.push_str(rest);

    seen.iter().all(|&n| n == 1).then_some(content)
}
