//! Per-render state and the block-marker API.
//!
//! A [`RenderContext`] is created at the start of a render, handed to each
//! frame of the chain in turn, and consumed when the render is finalized.
//! Frame bodies talk to it through the block-marker operations:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`write`](RenderContext::write) | append text to the active target |
//! | [`start_block`](RenderContext::start_block) | open a new generation of a block |
//! | [`end_block`](RenderContext::end_block) | close the innermost generation |
//! | [`empty_block`](RenderContext::empty_block) | open and close with no content |
//! | [`super_block`](RenderContext::super_block) | write the overridden generation's content |
//! | [`get_super_block`](RenderContext::get_super_block) | return it instead |
//! | [`mark_root`](RenderContext::mark_root) | declare this frame the document root |
//! | [`flush`](RenderContext::flush) | finalize now; later writes go straight to the sink |
//!
//! # Root Selection
//!
//! Each frame writes its top-level text into its own stream. When the render is
//! finalized only one of those streams becomes the document:
//!
//! 1. the stream of the frame that called [`mark_root`](RenderContext::mark_root),
//! 2. otherwise the stream of the first frame that opened a block at top level,
//! 3. otherwise the first frame's stream.
//!
//! Top-level text of every other frame (and any slot first created there) is
//! discarded. This is what lets a child frame redefine blocks without its
//! surrounding text leaking into the output.

use std::io::Write;

use crate::block::{BlockRegistry, CaptureStack, SlotAnchor};
use crate::config::RenderConfig;
use crate::content::Content;
use crate::error::BlockError;
use crate::filter::pipeline;
use crate::filter::{FilterRegistry, FilterSpec};
use crate::finalize::finalize;

/// Where the final output goes.
pub(crate) enum Sink<'r> {
    /// Accumulate into a string returned by the render.
    Capture(String),
    /// Write through to a caller-supplied writer.
    Direct(&'r mut dyn Write),
}

impl Sink<'_> {
    fn emit(&mut self, text: &str) -> Result<(), BlockError> {
        match self {
            Sink::Capture(buffer) => buffer.push_str(text),
            Sink::Direct(writer) => writer.write_all(text.as_bytes())?,
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), BlockError> {
        if let Sink::Direct(writer) = self {
            writer.flush()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct FrameTracker {
    names: Vec<String>,
    streams: Vec<Content>,
    marked_root: Option<usize>,
    first_block_frame: Option<usize>,
}

impl FrameTracker {
    fn current(&self) -> usize {
        self.names.len().saturating_sub(1)
    }

    fn root(&self) -> usize {
        self.marked_root.or(self.first_block_frame).unwrap_or(0)
    }
}

/// State of a single render.
pub struct RenderContext<'r> {
    filters: &'r FilterRegistry,
    config: &'r RenderConfig,
    blocks: BlockRegistry,
    capture: CaptureStack,
    frames: FrameTracker,
    sink: Sink<'r>,
    flushed: bool,
}

impl<'r> RenderContext<'r> {
    pub(crate) fn new(filters: &'r FilterRegistry, config: &'r RenderConfig, sink: Sink<'r>) -> Self {
        tracing::debug!(filters = filters.len(), "render started");
        Self {
            filters,
            config,
            blocks: BlockRegistry::new(),
            capture: CaptureStack::new(),
            frames: FrameTracker::default(),
            sink,
            flushed: false,
        }
    }

    // ---- frame lifecycle (driven by the renderer) ----

    pub(crate) fn begin_frame(&mut self, name: &str) {
        self.frames.names.push(name.to_string());
        tracing::trace!(frame = self.frames.current(), frame_name = name, "frame started");
    }

    /// Ends the current frame. Every block it opened must be closed by now.
    pub(crate) fn end_frame(&mut self) -> Result<(), BlockError> {
        if let Some(block) = self.capture.current_block() {
            return Err(BlockError::UnterminatedBlock {
                block: block.to_string(),
            });
        }
        // A frame that flushed mid-body has already handed its stream over.
        if self.frames.streams.len() < self.frames.names.len() {
            let stream = self.capture.take_top_level();
            self.frames.streams.push(stream);
        }
        tracing::trace!(frame = self.frames.current(), "frame finished");
        Ok(())
    }

    /// Finalizes the render if the chain did not flush explicitly.
    pub(crate) fn finish(mut self) -> Result<Sink<'r>, BlockError> {
        if !self.flushed {
            self.flush()?;
        }
        self.sink.finish()?;
        tracing::debug!(blocks = self.blocks.len(), "render finished");
        Ok(self.sink)
    }

    // ---- block-marker API ----

    /// Appends literal text to the active target.
    ///
    /// After [`flush`](Self::flush) the text goes straight to the sink.
    pub fn write(&mut self, text: &str) -> Result<(), BlockError> {
        if self.flushed {
            return self.sink.emit(text);
        }
        self.capture.write(text);
        Ok(())
    }

    /// Appends content, typically obtained from
    /// [`get_super_block`](Self::get_super_block), to the active target.
    ///
    /// After [`flush`](Self::flush) the content's slots are resolved
    /// immediately and the result goes straight to the sink.
    pub fn write_content(&mut self, content: &Content) -> Result<(), BlockError> {
        if self.flushed {
            let text = finalize(content, &self.blocks, self.config.max_substitution_passes)?;
            return self.sink.emit(&text);
        }
        self.capture.write_content(content);
        Ok(())
    }

    /// Opens a new generation of `name` with no filters.
    pub fn start_block(&mut self, name: &str) -> Result<(), BlockError> {
        self.start_block_with(name, FilterSpec::none())
    }

    /// Opens a new generation of `name` whose content will be passed through
    /// `filters` when it closes.
    ///
    /// The first time a name is seen in the render, its slot is written into
    /// the active target. Filter names are resolved here, so an unknown filter
    /// fails before any content is captured.
    pub fn start_block_with(
        &mut self,
        name: &str,
        filters: impl Into<FilterSpec>,
    ) -> Result<(), BlockError> {
        self.ensure_live("start_block")?;
        if self.capture.is_open(name) {
            return Err(BlockError::BlockAlreadyOpen {
                block: name.to_string(),
            });
        }
        let resolved = pipeline::resolve(&filters.into(), self.filters, name)?;
        let frame = self.frames.current();

        let anchor = SlotAnchor {
            frame,
            parent: self.capture.current_block().map(str::to_string),
        };
        let (created, sequence) = self.blocks.open_generation(name, anchor, resolved);
        if created {
            self.capture.write_slot(name);
            tracing::trace!(block = name, frame, "slot created");
        }
        if self.capture.depth() == 0 && self.frames.first_block_frame.is_none() {
            self.frames.first_block_frame = Some(frame);
        }

        self.capture.push(name);
        tracing::trace!(block = name, sequence, frame, "block opened");
        Ok(())
    }

    /// Closes the innermost open generation.
    pub fn end_block(&mut self) -> Result<(), BlockError> {
        self.close_block(None)
    }

    /// Closes the innermost open generation, checking that it is `name`.
    pub fn end_block_named(&mut self, name: &str) -> Result<(), BlockError> {
        self.close_block(Some(name))
    }

    /// Defines `name` with empty content.
    pub fn empty_block(&mut self, name: &str) -> Result<(), BlockError> {
        self.start_block(name)?;
        self.end_block_named(name)
    }

    /// Writes the content of the generation being overridden into the open block.
    pub fn super_block(&mut self) -> Result<(), BlockError> {
        let content = self.get_super_block()?;
        self.capture.write_content(&content);
        Ok(())
    }

    /// Returns the content of the generation being overridden.
    ///
    /// This is the resolved content of the generation immediately preceding
    /// the open one for the same name. It does not depend on the open
    /// generation's filters.
    pub fn get_super_block(&self) -> Result<Content, BlockError> {
        self.ensure_live("super_block")?;
        let block = self
            .capture
            .current_block()
            .ok_or(BlockError::SuperBlockOutsideBlock)?;
        Ok(self.blocks.super_content(block)?.clone())
    }

    /// Declares the executing frame the root of the document.
    pub fn mark_root(&mut self) -> Result<(), BlockError> {
        self.ensure_live("mark_root")?;
        let frame = self.frames.current();
        match self.frames.marked_root {
            Some(previous) if previous != frame => {
                Err(BlockError::RootAlreadyMarked { frame, previous })
            }
            _ => {
                self.frames.marked_root = Some(frame);
                tracing::debug!(frame, "frame marked as root");
                Ok(())
            }
        }
    }

    /// Finalizes the render now.
    ///
    /// All slots in the root stream are substituted with their blocks' final
    /// content and the result is emitted to the sink. Anything written
    /// afterwards bypasses block composition. Calling it twice is an error.
    pub fn flush(&mut self) -> Result<(), BlockError> {
        if self.flushed {
            return Err(BlockError::DoubleFlush);
        }
        if let Some(block) = self.capture.current_block() {
            return Err(BlockError::UnterminatedBlock {
                block: block.to_string(),
            });
        }

        // Flushing from inside a frame body: its stream is still on the stack.
        if self.frames.streams.len() < self.frames.names.len() {
            let stream = self.capture.take_top_level();
            self.frames.streams.push(stream);
        }

        let root = self.frames.root();
        tracing::debug!(
            root,
            frame = self.frames.names.get(root).map(String::as_str).unwrap_or("<none>"),
            "flushing render"
        );
        for (index, stream) in self.frames.streams.iter().enumerate() {
            if index != root && !stream.is_empty() {
                tracing::debug!(
                    frame = index,
                    slots = stream.slots().count(),
                    "discarding top-level output of non-root frame"
                );
            }
        }

        let output = match self.frames.streams.get(root) {
            Some(stream) => finalize(stream, &self.blocks, self.config.max_substitution_passes)?,
            None => String::new(),
        };
        self.sink.emit(&output)?;
        self.flushed = true;
        Ok(())
    }

    // ---- introspection ----

    /// Blocks recorded so far.
    pub fn blocks(&self) -> &BlockRegistry {
        &self.blocks
    }

    /// Index of the executing frame in the chain.
    pub fn frame_index(&self) -> usize {
        self.frames.current()
    }

    /// Name of the executing frame.
    pub fn frame_name(&self) -> &str {
        self.frames.names.last().map(String::as_str).unwrap_or("")
    }

    /// Number of blocks currently open.
    pub fn depth(&self) -> usize {
        self.capture.depth()
    }

    /// Name of the innermost open block.
    pub fn current_block(&self) -> Option<&str> {
        self.capture.current_block()
    }

    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    fn ensure_live(&self, operation: &'static str) -> Result<(), BlockError> {
        if self.flushed {
            Err(BlockError::AfterFlush { operation })
        } else {
            Ok(())
        }
    }

    fn close_block(&mut self, name: Option<&str>) -> Result<(), BlockError> {
        self.ensure_live("end_block")?;
        match (self.capture.current_block(), name) {
            (None, found) => {
                return Err(BlockError::UnmatchedEndBlock {
                    expected: None,
                    found: found.map(str::to_string),
                })
            }
            (Some(open), Some(found)) if open != found => {
                return Err(BlockError::UnmatchedEndBlock {
                    expected: Some(open.to_string()),
                    found: Some(found.to_string()),
                })
            }
            _ => {}
        }

        if let Some((block, raw)) = self.capture.pop() {
            self.blocks.close(&block, raw)?;
            tracing::trace!(block = %block, depth = self.capture.depth(), "block closed");
        }
        Ok(())
    }
}
