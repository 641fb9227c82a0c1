//! Frames described as data.
//!
//! A [`ScriptFrame`] is a recorded sequence of block-marker calls. It is the
//! serialized form of what a frame body does, not a template syntax: each
//! [`Step`] maps one-to-one onto a [`RenderContext`] operation. Scripts are
//! handy for fixtures and for hosts that precompute frame bodies.
//!
//! ```rust
//! use blockbase::{render, Chain, ScriptFrame};
//!
//! let base = ScriptFrame::from_yaml(r#"
//! name: base
//! steps:
//!   - { op: text, text: "<p>" }
//!   - { op: start, name: body }
//!   - { op: text, text: "default" }
//!   - { op: end }
//!   - { op: text, text: "</p>" }
//! "#).unwrap();
//!
//! let child = ScriptFrame::from_yaml(r#"
//! name: child
//! steps:
//!   - { op: start, name: body, filters: [upper] }
//!   - { op: super }
//!   - { op: text, text: " and more" }
//!   - { op: end, name: body }
//! "#).unwrap();
//!
//! let out = render(&Chain::new().frame(base).frame(child)).unwrap();
//! assert_eq!(out, "<p>DEFAULT AND MORE</p>");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::RenderContext;
use crate::error::BlockError;
use crate::frame::Frame;

/// One recorded block-marker call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Write literal text.
    Text { text: String },
    /// Open a block, with optional filter names.
    Start {
        name: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        filters: Vec<String>,
    },
    /// Close the innermost block, optionally checking its name.
    End {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Define a block with empty content.
    Empty { name: String },
    /// Write the overridden generation's content.
    Super,
    /// Declare this frame the root.
    MarkRoot,
    /// Finalize the render now.
    Flush,
}

/// A frame whose body is a list of [`Step`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFrame {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl ScriptFrame {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Parses a script from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, BlockError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads a script from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlockError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Serializes the script to YAML.
    pub fn to_yaml(&self) -> Result<String, BlockError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.steps.push(Step::Text { text: text.into() });
        self
    }

    pub fn start(self, name: impl Into<String>) -> Self {
        self.start_with(name, Vec::<String>::new())
    }

    pub fn start_with<I, S>(mut self, name: impl Into<String>, filters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(Step::Start {
            name: name.into(),
            filters: filters.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn end(mut self) -> Self {
        self.steps.push(Step::End { name: None });
        self
    }

    pub fn end_named(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::End {
            name: Some(name.into()),
        });
        self
    }

    pub fn empty(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Empty { name: name.into() });
        self
    }

    pub fn super_block(mut self) -> Self {
        self.steps.push(Step::Super);
        self
    }

    pub fn mark_root(mut self) -> Self {
        self.steps.push(Step::MarkRoot);
        self
    }

    pub fn flush(mut self) -> Self {
        self.steps.push(Step::Flush);
        self
    }
}

impl Frame for ScriptFrame {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut RenderContext<'_>) -> Result<(), BlockError> {
        for step in &self.steps {
            match step {
                Step::Text { text } => ctx.write(text)?,
                Step::Start { name, filters } => ctx.start_block_with(name, filters.clone())?,
                Step::End { name: Some(name) } => ctx.end_block_named(name)?,
                Step::End { name: None } => ctx.end_block()?,
                Step::Empty { name } => ctx.empty_block(name)?,
                Step::Super => ctx.super_block()?,
                Step::MarkRoot => ctx.mark_root()?,
                Step::Flush => ctx.flush()?,
            }
        }
        Ok(())
    }
}
