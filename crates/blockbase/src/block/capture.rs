//! Nested output capture.

use crate::content::Content;

#[derive(Debug)]
struct Capture {
    block: String,
    buffer: Content,
}

/// Stack of write targets for the frame that is currently executing.
///
/// The bottom is the frame's top-level stream; every open block generation
/// pushes its own buffer on top. Writes always land in the topmost target.
/// Pushes and pops happen only in lockstep with opening and closing blocks.
#[derive(Debug, Default)]
pub struct CaptureStack {
    top_level: Content,
    open: Vec<Capture>,
}

impl CaptureStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal text to the active target.
    pub fn write(&mut self, text: &str) {
        self.target_mut().push_str(text);
    }

    /// Appends a slot reference to the active target.
    pub fn write_slot(&mut self, block: &str) {
        self.target_mut().push_slot(block);
    }

    /// Appends every segment of `content` to the active target.
    pub fn write_content(&mut self, content: &Content) {
        self.target_mut().extend(content);
    }

    /// Starts capturing into a fresh buffer for `block`.
    pub fn push(&mut self, block: &str) {
        self.open.push(Capture {
            block: block.to_string(),
            buffer: Content::new(),
        });
    }

    /// Stops capturing the innermost block and returns its name and buffer.
    pub fn pop(&mut self) -> Option<(String, Content)> {
        self.open
            .pop()
            .map(|capture| (capture.block, capture.buffer))
    }

    /// Name of the innermost open block.
    pub fn current_block(&self) -> Option<&str> {
        self.open.last().map(|capture| capture.block.as_str())
    }

    /// Whether a block of this name is open anywhere on the stack.
    pub fn is_open(&self, block: &str) -> bool {
        self.open.iter().any(|capture| capture.block == block)
    }

    /// Number of open blocks.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Takes the top-level stream, leaving an empty one behind.
    pub fn take_top_level(&mut self) -> Content {
        std::mem::take(&mut self.top_level)
    }

    fn target_mut(&mut self) -> &mut Content {
        match self.open.last_mut() {
            Some(capture) => &mut capture.buffer,
            None => &mut self.top_level,
        }
    }
}
