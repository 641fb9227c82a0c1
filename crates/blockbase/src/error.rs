//! Error types for block composition.
//!
//! This module provides [`BlockError`], the single error type returned by every
//! block-marker operation, the frame driver and the finalizer. Any error aborts
//! the render at the point of detection; nothing is delivered to the sink
//! before a successful flush.

/// Error type for block composition and rendering.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// `end_block` named a block other than the open one, or nothing is open.
    #[error("unmatched end of block: expected {}, found {}", describe(.expected), describe(.found))]
    UnmatchedEndBlock {
        /// Name of the innermost open block, if any.
        expected: Option<String>,
        /// Name passed to `end_block_named`, if any.
        found: Option<String>,
    },

    /// A frame (or the chain) finished while a block it opened was still open.
    #[error("block '{block}' was never closed")]
    UnterminatedBlock { block: String },

    /// `super_block` was called in the first generation of a block.
    #[error("block '{block}' has no earlier definition to supersede")]
    NoSuperGeneration { block: String },

    /// `super_block` was called while no block is open.
    #[error("super block requested outside of any block")]
    SuperBlockOutsideBlock,

    /// `flush` was called after the render was already finalized.
    #[error("render has already been flushed")]
    DoubleFlush,

    /// Slot substitution did not reach a fixed point within the pass bound.
    #[error("block '{block}' still unresolved after {passes} substitution passes (self-referential blocks?)")]
    UnresolvableSlotCycle { block: String, passes: usize },

    /// A slot refers to a block with no closed generation.
    #[error("slot for block '{block}' has no closed definition to render")]
    UnresolvedSlot { block: String },

    /// A named filter is not present in the filter registry.
    #[error("unknown filter '{filter}' on block '{block}'")]
    UnknownFilter { filter: String, block: String },

    /// A block was opened while a generation of the same name is still open.
    #[error("block '{block}' is already open and cannot be nested inside itself")]
    BlockAlreadyOpen { block: String },

    /// Two different frames declared themselves as the root.
    #[error("frame {frame} cannot mark itself as root: frame {previous} already did")]
    RootAlreadyMarked { frame: usize, previous: usize },

    /// A block marker was used after the render was flushed.
    #[error("'{operation}' called after the render was flushed")]
    AfterFlush { operation: &'static str },

    /// A filter removed or duplicated the slot of a nested block.
    #[error("filter '{filter}' corrupted a nested block slot in block '{block}'")]
    CorruptedSlot { block: String, filter: String },

    /// A frame body reported a failure of its own.
    #[error("frame '{frame}' failed: {message}")]
    Frame { frame: String, message: String },

    /// Writing to the direct-emit sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration or scripted frame document could not be parsed.
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BlockError {
    /// Creates a [`BlockError::Frame`] for host-side failures inside a frame body.
    pub fn frame(frame: impl Into<String>, message: impl Into<String>) -> Self {
        BlockError::Frame {
            frame: frame.into(),
            message: message.into(),
        }
    }

    /// Returns the block this error is about, when there is one.
    pub fn block(&self) -> Option<&str> {
        match self {
            BlockError::UnmatchedEndBlock { expected, found } => {
                found.as_deref().or(expected.as_deref())
            }
            BlockError::UnterminatedBlock { block }
            | BlockError::NoSuperGeneration { block }
            | BlockError::UnresolvableSlotCycle { block, .. }
            | BlockError::UnresolvedSlot { block }
            | BlockError::UnknownFilter { block, .. }
            | BlockError::BlockAlreadyOpen { block }
            | BlockError::CorruptedSlot { block, .. } => Some(block),
            _ => None,
        }
    }
}

fn describe(name: &Option<String>) -> String {
    match name {
        Some(name) => format!("'{}'", name),
        None => "no open block".to_string(),
    }
}
