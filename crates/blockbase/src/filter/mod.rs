//! Text filters applied to a block generation when it closes.
//!
//! A filter is a pure `&str -> String` transform. Blocks refer to filters
//! either by name, looked up in a [`FilterRegistry`], or by value, as an inline
//! closure. Whatever form the caller uses, it is normalized into a
//! [`FilterSpec`]: an ordered list of [`FilterRef`]s.
//!
//! ## Accepted Forms
//!
//! | Input | Normalized to |
//! |-------|---------------|
//! | `"trim"` | `[Named("trim")]` |
//! | `"trim | upper"`, `"trim,upper"`, `"trim upper"` | `[Named("trim"), Named("upper")]` |
//! | `["trim", "upper"]` | `[Named("trim"), Named("upper")]` |
//! | `FilterRef::inline(f)` | `[Inline(f)]` |
//! | `vec![FilterRef::named("trim"), FilterRef::inline(f)]` | as given |
//!
//! Filters run left to right, exactly once per generation. See
//! [`pipeline`] for how content containing nested block slots is filtered.

pub(crate) mod pipeline;
mod registry;

use std::fmt;
use std::sync::Arc;

pub use registry::{escape_html, FilterRegistry};

/// A shareable text transform.
pub type FilterFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Characters separating filter names in a delimited list.
pub const FILTER_DELIMITERS: &[char] = &['|', ','];

/// A reference to a single filter.
#[derive(Clone)]
pub enum FilterRef {
    /// Looked up by name in the render's [`FilterRegistry`].
    Named(String),
    /// Supplied directly, with a label used in error messages.
    Inline { label: String, transform: FilterFn },
}

impl FilterRef {
    /// Creates a reference to a registered filter.
    pub fn named(name: impl Into<String>) -> Self {
        FilterRef::Named(name.into())
    }

    /// Wraps a closure as an anonymous inline filter.
    pub fn inline<F>(f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::inline_labeled("<inline>", f)
    }

    /// Wraps a closure as an inline filter with a descriptive label.
    pub fn inline_labeled<F>(label: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        FilterRef::Inline {
            label: label.into(),
            transform: Arc::new(f),
        }
    }

    /// Name or label of the filter.
    pub fn label(&self) -> &str {
        match self {
            FilterRef::Named(name) => name,
            FilterRef::Inline { label, .. } => label,
        }
    }
}

impl fmt::Debug for FilterRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterRef::Named(name) => f.debug_tuple("Named").field(name).finish(),
            FilterRef::Inline { label, .. } => f.debug_tuple("Inline").field(label).finish(),
        }
    }
}

/// An ordered list of filters, normalized from any accepted input form.
#[derive(Debug, Clone, Default)]
pub struct FilterSpec {
    filters: Vec<FilterRef>,
}

impl FilterSpec {
    /// An empty filter list.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parses a delimited list of filter names.
    ///
    /// Names are separated by `|`, `,` or whitespace; empty entries are skipped.
    pub fn parse(list: &str) -> Self {
        let filters = list
            .split(|c: char| FILTER_DELIMITERS.contains(&c) || c.is_whitespace())
            .filter(|name| !name.is_empty())
            .map(FilterRef::named)
            .collect();
        Self { filters }
    }

    /// Appends a filter to the end of the list.
    pub fn then(mut self, filter: impl Into<FilterRef>) -> Self {
        self.filters.push(filter.into());
        self
    }

    /// The filters in application order.
    pub fn filters(&self) -> &[FilterRef] {
        &self.filters
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }
}

impl From<&str> for FilterRef {
    fn from(name: &str) -> Self {
        FilterRef::named(name.trim())
    }
}

impl From<String> for FilterRef {
    fn from(name: String) -> Self {
        FilterRef::from(name.as_str())
    }
}

impl From<&str> for FilterSpec {
    fn from(list: &str) -> Self {
        FilterSpec::parse(list)
    }
}

impl From<String> for FilterSpec {
    fn from(list: String) -> Self {
        FilterSpec::parse(&list)
    }
}

impl From<FilterRef> for FilterSpec {
    fn from(filter: FilterRef) -> Self {
        Self {
            filters: vec![filter],
        }
    }
}

impl From<Vec<FilterRef>> for FilterSpec {
    fn from(filters: Vec<FilterRef>) -> Self {
        Self { filters }
    }
}

impl From<Vec<String>> for FilterSpec {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().map(FilterRef::from).collect()
    }
}

impl From<&[&str]> for FilterSpec {
    fn from(names: &[&str]) -> Self {
        names.iter().copied().map(FilterRef::from).collect()
    }
}

impl<const N: usize> From<[&str; N]> for FilterSpec {
    fn from(names: [&str; N]) -> Self {
        names.into_iter().map(FilterRef::from).collect()
    }
}

impl FromIterator<FilterRef> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = FilterRef>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}
