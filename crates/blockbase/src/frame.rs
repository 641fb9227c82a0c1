//! Frames and the inclusion chain.
//!
//! A [`Frame`] is one template unit's execution: whatever it writes, and the
//! blocks it defines, through the [`RenderContext`] it is given. How a frame
//! produces text (a compiled template, a closure, a [`ScriptFrame`]) is hidden
//! behind [`Frame::run`].
//!
//! A [`Chain`] is the already-resolved sequence of frames, least-derived
//! (base) first, most-derived (leaf) last. Locating units and following their
//! parent declarations happens before the chain is built.
//!
//! [`ScriptFrame`]: crate::ScriptFrame

use std::fmt;

use crate::context::RenderContext;
use crate::error::BlockError;

/// A unit of template execution.
///
/// # Implementing for Closures
///
/// A blanket implementation is provided for closures, and [`FnFrame`] pairs a
/// closure with a name for diagnostics:
///
/// ```rust
/// use blockbase::{Chain, FnFrame, RenderContext};
///
/// let base = FnFrame::new("base", |ctx: &mut RenderContext<'_>| {
///     ctx.write("<h1>")?;
///     ctx.empty_block("title")?;
///     ctx.write("</h1>")
/// });
/// let chain = Chain::new().frame(base);
/// assert_eq!(chain.len(), 1);
/// ```
pub trait Frame {
    /// Name used in logs and error messages.
    fn name(&self) -> &str {
        "<anonymous>"
    }

    /// Executes the frame body against the render context.
    fn run(&self, ctx: &mut RenderContext<'_>) -> Result<(), BlockError>;
}

/// Blanket implementation for closures taking the render context.
impl<F> Frame for F
where
    F: Fn(&mut RenderContext<'_>) -> Result<(), BlockError>,
{
    fn run(&self, ctx: &mut RenderContext<'_>) -> Result<(), BlockError> {
        (self)(ctx)
    }
}

/// A named closure frame.
pub struct FnFrame<F> {
    name: String,
    body: F,
}

impl<F> FnFrame<F>
where
    F: Fn(&mut RenderContext<'_>) -> Result<(), BlockError>,
{
    pub fn new(name: impl Into<String>, body: F) -> Self {
        Self {
            name: name.into(),
            body,
        }
    }
}

impl<F> Frame for FnFrame<F>
where
    F: Fn(&mut RenderContext<'_>) -> Result<(), BlockError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut RenderContext<'_>) -> Result<(), BlockError> {
        (self.body)(ctx)
    }
}

impl<F> fmt::Debug for FnFrame<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFrame").field("name", &self.name).finish()
    }
}

/// An ordered sequence of frames, base first.
#[derive(Default)]
pub struct Chain<'f> {
    frames: Vec<Box<dyn Frame + 'f>>,
}

impl<'f> Chain<'f> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a more-derived frame.
    pub fn frame(mut self, frame: impl Frame + 'f) -> Self {
        self.frames.push(Box::new(frame));
        self
    }

    /// Appends a named closure frame.
    pub fn frame_fn<F>(self, name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&mut RenderContext<'_>) -> Result<(), BlockError> + 'f,
    {
        self.frame(FnFrame::new(name, body))
    }

    /// Appends an already boxed frame.
    pub fn push(&mut self, frame: Box<dyn Frame + 'f>) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Box<dyn Frame + 'f>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl fmt::Debug for Chain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.frames.iter().map(|frame| frame.name()))
            .finish()
    }
}

/// Runs every frame in order, then finalizes unless a frame flushed already.
pub(crate) fn drive<'r>(
    chain: &Chain<'_>,
    mut ctx: RenderContext<'r>,
) -> Result<crate::context::Sink<'r>, BlockError> {
    for frame in chain.frames() {
        ctx.begin_frame(frame.name());
        frame.run(&mut ctx)?;
        ctx.end_frame()?;
    }
    ctx.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_keeps_order_and_names() {
        let chain = Chain::new()
            .frame_fn("base", |ctx| ctx.write("a"))
            .frame_fn("child", |ctx| ctx.write("b"));
        assert_eq!(chain.len(), 2);
        let names: Vec<&str> = chain.frames().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["base", "child"]);
        assert_eq!(format!("{:?}", chain), "[\"base\", \"child\"]");
    }

    #[test]
    fn test_plain_closure_frame_is_anonymous() {
        fn body(ctx: &mut RenderContext<'_>) -> Result<(), BlockError> {
            ctx.write("x")
        }
        let chain = Chain::new().frame(body);
        assert_eq!(chain.frames()[0].name(), "<anonymous>");
    }

    #[test]
    fn test_empty_chain() {
        let chain = Chain::new();
        assert!(chain.is_empty());
    }
}
