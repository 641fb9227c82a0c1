//! Output segments: literal text interleaved with block slots.
//!
//! Every output stream in a render (a frame's top-level stream or a block's
//! capture buffer) is a [`Content`]: an ordered list of [`Segment`]s. Adjacent
//! literal text is always coalesced, so a content without slots holds at most
//! one text segment.

/// One piece of an output stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text.
    Text(String),
    /// Placeholder for the final content of the named block.
    Slot(String),
}

/// An ordered sequence of segments.
///
/// Returned by [`RenderContext::get_super_block`](crate::RenderContext::get_super_block)
/// so that slots nested inside overridden content stay symbolic until the
/// render is finalized.
///
/// ```rust
/// use blockbase::Content;
///
/// let mut content = Content::from("Hello");
/// content.push_str(", world");
/// assert_eq!(content.as_literal(), Some("Hello, world"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Content {
    segments: Vec<Segment>,
}

impl Content {
    /// Creates an empty content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends literal text, merging it with a trailing text segment.
    pub fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_string()));
        }
    }

    /// Appends a slot reference for `block`.
    pub(crate) fn push_slot(&mut self, block: impl Into<String>) {
        self.segments.push(Segment::Slot(block.into()));
    }

    /// Appends every segment of `other`.
    pub fn extend(&mut self, other: &Content) {
        for segment in &other.segments {
            self.push_segment(segment.clone());
        }
    }

    pub(crate) fn push_segment(&mut self, segment: Segment) {
        match segment {
            Segment::Text(text) => self.push_str(&text),
            slot @ Segment::Slot(_) => self.segments.push(slot),
        }
    }

    /// Returns the segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns true if there is neither text nor slots.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns true if the content contains no slot references.
    pub fn is_literal(&self) -> bool {
        self.slots().next().is_none()
    }

    /// Returns the text when the content holds no slot references.
    pub fn as_literal(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [] => Some(""),
            [Segment::Text(text)] => Some(text),
            _ => None,
        }
    }

    /// Iterates over the names of the blocks referenced by slots.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Applies `f` to every literal run, leaving slots untouched.
    pub fn map_text<F>(&self, mut f: F) -> Content
    where
        F: FnMut(&str) -> String,
    {
        let mut mapped = Content::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => mapped.push_str(&f(text)),
                Segment::Slot(name) => mapped.push_slot(name.clone()),
            }
        }
        mapped
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        let mut content = Content::new();
        content.push_str(text);
        content
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::from(text.as_str())
    }
}
