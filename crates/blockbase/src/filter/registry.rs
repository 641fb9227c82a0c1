//! Named filter lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::FilterFn;

/// Maps filter names to transforms.
///
/// [`FilterRegistry::default`] comes with the built-in filters; use
/// [`FilterRegistry::new`] for an empty registry.
///
/// # Built-in Filters
///
/// | Name | Effect |
/// |------|--------|
/// | `trim` | strip leading and trailing whitespace |
/// | `upper` | uppercase |
/// | `lower` | lowercase |
/// | `nl` | append a newline |
/// | `escape` | HTML-escape `< > & " '` |
///
/// # Example
///
/// ```rust
/// use blockbase::FilterRegistry;
///
/// let mut filters = FilterRegistry::default();
/// filters.add("exclaim", |s| format!("{}!!!", s.trim()));
///
/// let exclaim = filters.get("exclaim").unwrap();
/// assert_eq!(exclaim("  hi\n"), "hi!!!");
/// ```
#[derive(Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, FilterFn>,
}

impl FilterRegistry {
    /// Creates a registry with no filters.
    pub fn new() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    /// Registers (or replaces) a named filter.
    pub fn add<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.filters.insert(name.into(), Arc::new(f));
        self
    }

    /// Builder form of [`add`](Self::add).
    pub fn with<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.add(name, f);
        self
    }

    /// Looks up a filter by name.
    pub fn get(&self, name: &str) -> Option<FilterFn> {
        self.filters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    fn register_builtins(&mut self) {
        self.add("trim", |s| s.trim().to_string());
        self.add("upper", |s| s.to_uppercase());
        self.add("lower", |s| s.to_lowercase());
        // Explicit line break control: "x" -> "x\n"
        self.add("nl", |s| format!("{}\n", s));
        self.add("escape", escape_html);
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register_builtins();
        registry
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

/// Escapes HTML special characters.
///
/// ```rust
/// use blockbase::filter::escape_html;
///
/// assert_eq!(escape_html("<b>Tom & 'Jerry'</b>"), "&lt;b&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/b&gt;");
/// ```
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
