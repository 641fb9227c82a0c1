//! Block bookkeeping: the registry of generations and the capture stack.
//!
//! A block name is first encountered exactly once per render. At that moment
//! its slot is written into whichever target is active (a frame's top-level
//! stream or an enclosing block's buffer) and the slot never moves again.
//! Every later definition of the name only appends a [`Generation`]; the slot
//! resolves to the last one when the render is finalized.

mod capture;
mod registry;

pub use capture::CaptureStack;
pub use registry::{BlockEntry, BlockRegistry, Generation, SlotAnchor};
