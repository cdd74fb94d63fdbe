//! Lookup results.
//!
//! # Responsibilities
//! - Expose the matched pattern and its method bindings
//! - Expose values captured from the path, by position or by name
//!
//! # Design Decisions
//! - Values align positionally with the entry's parameter names
//! - Name lookup is a linear scan: patterns carry few parameters
//! - Reusable: `reset` clears it for another lookup without freeing the buffer

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use super::entry::RouteEntry;
use super::method::MethodSet;

/// The outcome of a routing tree lookup.
pub struct RouteMatch<H> {
    pub(super) entry: Option<Arc<RouteEntry<H>>>,
    pub(super) values: Vec<String>,
}

impl<H> Default for RouteMatch<H> {
    fn default() -> Self {
        Self {
            entry: None,
            values: Vec::new(),
        }
    }
}

impl<H> Clone for RouteMatch<H> {
    fn clone(&self) -> Self {
        Self {
            entry: self.entry.clone(),
            values: self.values.clone(),
        }
    }
}

impl<H> RouteMatch<H> {
    /// Clear the match for reuse.
    pub fn reset(&mut self) {
        self.entry = None;
        self.values.clear();
    }

    pub fn is_match(&self) -> bool {
        self.entry.is_some()
    }

    /// The matched pattern, or `""`.
    pub fn pattern(&self) -> &str {
        self.entry.as_ref().map_or("", |e| e.pattern())
    }

    /// Parameter names in the order they appear in the pattern.
    pub fn param_names(&self) -> &[String] {
        match &self.entry {
            Some(entry) => entry.params(),
            None => &[],
        }
    }

    /// Captured values, aligned with [`param_names`](Self::param_names).
    pub fn values(&self) -> &[String] {
        match self.entry {
            Some(_) => self.values.as_slice(),
            None => &[],
        }
    }

    /// The value captured for `name`, or `""`.
    pub fn param(&self, name: &str) -> &str {
        self.param_names()
            .iter()
            .position(|k| k == name)
            .and_then(|i| self.values.get(i))
            .map_or("", String::as_str)
    }

    /// (name, value) pairs in pattern order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.param_names()
            .iter()
            .zip(self.values())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Every method the matched route answers.
    pub fn methods(&self) -> &MethodSet {
        self.entry
            .as_ref()
            .map_or(MethodSet::empty(), |e| e.methods())
    }

    /// The handler bound to `method`, if any.
    pub fn handler(&self, method: &Method) -> Option<&H> {
        self.entry.as_ref().and_then(|e| e.handler(method))
    }
}

impl<H> fmt::Debug for RouteMatch<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern())
            .field("values", &self.values)
            .finish()
    }
}
