//! Render configuration.
//!
//! Configuration can be built in code or loaded from YAML:
//!
//! ```rust
//! use blockbase::RenderConfig;
//!
//! let config = RenderConfig::from_yaml("max_substitution_passes: 16").unwrap();
//! assert_eq!(config.max_substitution_passes, 16);
//!
//! // Missing keys fall back to defaults
//! let config = RenderConfig::from_yaml("{}").unwrap();
//! assert_eq!(config, RenderConfig::default());
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BlockError;

/// Default bound on slot nesting during finalization.
pub const DEFAULT_MAX_SUBSTITUTION_PASSES: usize = 64;

/// Settings shared by every render of a [`Renderer`](crate::Renderer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// How many levels of slot substitution the finalizer performs before it
    /// gives up and reports a cycle.
    pub max_substitution_passes: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_substitution_passes: DEFAULT_MAX_SUBSTITUTION_PASSES,
        }
    }
}

impl RenderConfig {
    /// Parses configuration from a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, BlockError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BlockError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Sets the substitution bound.
    pub fn with_max_substitution_passes(mut self, passes: usize) -> Self {
        self.max_substitution_passes = passes;
        self
    }
}
