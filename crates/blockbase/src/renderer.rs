//! Rendering chains of frames.
//!
//! [`Renderer`] bundles the filter registry and configuration shared by every
//! render, and chooses where the output goes:
//!
//! | Method | Sink |
//! |--------|------|
//! | [`Renderer::render`] | returned as a `String` |
//! | [`Renderer::render_to`] | written to any [`std::io::Write`] |
//!
//! Each call builds a fresh [`RenderContext`](crate::RenderContext); nothing
//! carries over between renders. Output reaches the sink only when the render
//! is flushed, so a failing render never leaves partial output behind (unless
//! a frame flushed explicitly before failing).

use std::io::Write;

use crate::config::RenderConfig;
use crate::context::{RenderContext, Sink};
use crate::error::BlockError;
use crate::filter::FilterRegistry;
use crate::frame::{drive, Chain};

/// Renders chains with a fixed set of filters and configuration.
///
/// # Example
///
/// ```rust
/// use blockbase::{Chain, FilterRegistry, Renderer};
///
/// let filters = FilterRegistry::default().with("exclaim", |s| format!("{}!!!", s.trim()));
/// let renderer = Renderer::new().with_filters(filters);
///
/// let chain = Chain::new().frame_fn("page", |ctx| {
///     ctx.start_block_with("headline", "exclaim")?;
///     ctx.write("  This is the content\n")?;
///     ctx.end_block()
/// });
///
/// assert_eq!(renderer.render(&chain).unwrap(), "This is the content!!!");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    filters: FilterRegistry,
    config: RenderConfig,
}

impl Renderer {
    /// Creates a renderer with the built-in filters and default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the filter registry.
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: RenderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn filters(&self) -> &FilterRegistry {
        &self.filters
    }

    /// Mutable access for registering additional filters.
    pub fn filters_mut(&mut self) -> &mut FilterRegistry {
        &mut self.filters
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Renders `chain` and returns the composed output.
    pub fn render(&self, chain: &Chain<'_>) -> Result<String, BlockError> {
        let ctx = RenderContext::new(&self.filters, &self.config, Sink::Capture(String::new()));
        match drive(chain, ctx)? {
            Sink::Capture(output) => Ok(output),
            Sink::Direct(_) => Ok(String::new()),
        }
    }

    /// Renders `chain`, writing the composed output to `writer` at flush time.
    pub fn render_to<W: Write>(&self, chain: &Chain<'_>, writer: &mut W) -> Result<(), BlockError> {
        let ctx = RenderContext::new(&self.filters, &self.config, Sink::Direct(writer));
        drive(chain, ctx)?;
        Ok(())
    }
}
