//! # Blockbase - Block Inheritance for Composed Templates
//!
//! `blockbase` resolves a chain of template frames into a single output. Each
//! frame contributes literal text and named, overridable regions called
//! blocks. A more-derived frame's definition of a block replaces a
//! less-derived one's, blocks nobody overrides keep their default content, and
//! an override may splice in the content it replaces.
//!
//! No template syntax is involved: frames drive the engine through the
//! block-marker API on [`RenderContext`], and how a frame produces its text is
//! up to the host.
//!
//! ## Core Concepts
//!
//! - [`Frame`]: one template unit's execution
//! - [`Chain`]: the ordered frames, base first
//! - [`RenderContext`]: per-render state and the block-marker API
//! - [`BlockRegistry`]: every block's generations (successive definitions)
//! - [`FilterRegistry`]: named text transforms applied when a block closes
//! - [`Renderer`]: renders chains into a `String` or any `io::Write`
//!
//! ## Quick Start
//!
//! ```rust
//! use blockbase::{render, Chain};
//!
//! let chain = Chain::new()
//!     .frame_fn("base", |ctx| {
//!         ctx.write("<h1>")?;
//!         ctx.start_block("top")?;
//!         ctx.write("The Main Title")?;
//!         ctx.end_block()?;
//!         ctx.write("</h1><footer>")?;
//!         ctx.start_block("footer")?;
//!         ctx.write("Copyright 2010")?;
//!         ctx.end_block()?;
//!         ctx.write("</footer>")
//!     })
//!     .frame_fn("child", |ctx| {
//!         ctx.start_block("top")?;
//!         ctx.super_block()?;
//!         ctx.write(": Subtitle")?;
//!         ctx.end_block()
//!     });
//!
//! let out = render(&chain).unwrap();
//! assert_eq!(out, "<h1>The Main Title: Subtitle</h1><footer>Copyright 2010</footer>");
//! ```
//!
//! ## How Resolution Works
//!
//! 1. The first time a block name is seen, a slot is written at the current
//!    position. That position never changes.
//! 2. Every definition of the name appends a generation. When a generation
//!    closes, its filters run once over what it captured.
//! 3. On flush, each slot is replaced by its block's last generation, and
//!    slots nested inside that content are replaced in turn.
//!
//! ## Filters
//!
//! ```rust
//! use blockbase::{Chain, FilterRef, FilterRegistry, Renderer};
//!
//! let renderer = Renderer::new()
//!     .with_filters(FilterRegistry::default().with("exclaim", |s| format!("{}!!!", s.trim())));
//!
//! let chain = Chain::new().frame_fn("page", |ctx| {
//!     ctx.start_block_with("a", "trim | upper")?;
//!     ctx.write("  quiet  ")?;
//!     ctx.end_block()?;
//!     ctx.start_block_with("b", FilterRef::inline(|s| s.replace(' ', "_")))?;
//!     ctx.write(" spaced out ")?;
//!     ctx.end_block()
//! });
//!
//! assert_eq!(renderer.render(&chain).unwrap(), "QUIET_spaced_out_");
//! ```

pub mod block;
pub mod config;
pub mod content;
pub mod context;
mod error;
pub mod filter;
mod finalize;
pub mod frame;
pub mod renderer;
pub mod script;

pub use block::{BlockEntry, BlockRegistry, Generation, SlotAnchor};
pub use config::{RenderConfig, DEFAULT_MAX_SUBSTITUTION_PASSES};
pub use content::{Content, Segment};
pub use context::RenderContext;
pub use error::BlockError;
pub use filter::{FilterFn, FilterRef, FilterRegistry, FilterSpec};
pub use frame::{Chain, FnFrame, Frame};
pub use renderer::Renderer;
pub use script::{ScriptFrame, Step};

/// Renders `chain` with the built-in filters and default configuration.
pub fn render(chain: &Chain<'_>) -> Result<String, BlockError> {
    Renderer::new().render(chain)
}
