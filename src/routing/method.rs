//! HTTP method sets.
//!
//! # Responsibilities
//! - Hold an ordered, duplicate-free list of methods
//! - Render the list as an `Allow` header value
//!
//! # Design Decisions
//! - Backed by a `Vec`: sets hold a handful of methods, a linear scan beats hashing
//! - Sets only grow; mutating operations consume and return the set

use std::fmt;

use axum::http::{HeaderValue, Method};

static EMPTY: MethodSet = MethodSet(Vec::new());

/// An insertion-ordered set of HTTP methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSet(Vec<Method>);

impl MethodSet {
    /// Build a set from `methods`, dropping duplicates.
    pub fn new<I>(methods: I) -> Self
    where
        I: IntoIterator<Item = Method>,
    {
        methods.into_iter().fold(Self::default(), Self::add)
    }

    /// The methods defined in RFC 9110 section 9 and RFC 5789.
    ///
    /// The full set of methods is open-ended, so "any" means this common subset.
    pub fn any() -> Self {
        Self(vec![
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::CONNECT,
            Method::OPTIONS,
            Method::TRACE,
        ])
    }

    /// A shared empty set.
    pub(crate) fn empty() -> &'static Self {
        &EMPTY
    }

    /// Append `method` unless already present.
    pub fn add(mut self, method: Method) -> Self {
        if !self.has(&method) {
            self.0.push(method);
        }
        self
    }

    /// Append every method of `other` not already present, keeping its order.
    pub fn union(self, other: &MethodSet) -> Self {
        other.iter().cloned().fold(self, Self::add)
    }

    /// Returns true if the set contains `method`.
    pub fn has(&self, method: &Method) -> bool {
        self.0.contains(method)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Method> {
        self.0.iter()
    }

    /// The set rendered for an `Allow` header.
    pub fn header_value(&self) -> Option<HeaderValue> {
        HeaderValue::try_from(self.to_string()).ok()
    }
}

impl fmt::Display for MethodSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, method) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(method.as_str())?;
        }
        Ok(())
    }
}

impl From<Method> for MethodSet {
    fn from(method: Method) -> Self {
        Self(vec![method])
    }
}

impl FromIterator<Method> for MethodSet {
    fn from_iter<I: IntoIterator<Item = Method>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a MethodSet {
    type Item = &'a Method;
    type IntoIter = std::slice::Iter<'a, Method>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_drops_duplicates() {
        let set = MethodSet::new([Method::GET, Method::POST, Method::GET]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_string(), "GET, POST");
    }

    #[test]
    fn test_add_keeps_insertion_order() {
        let set = MethodSet::from(Method::POST)
            .add(Method::GET)
            .add(Method::POST)
            .add(Method::OPTIONS);
        assert_eq!(set.to_string(), "POST, GET, OPTIONS");
        assert!(set.has(&Method::GET));
        assert!(!set.has(&Method::DELETE));
    }

    #[test]
    fn test_union() {
        let left = MethodSet::new([Method::GET, Method::HEAD]);
        let right = MethodSet::new([Method::POST, Method::GET]);
        assert_eq!(left.union(&right).to_string(), "GET, HEAD, POST");
    }

    #[test]
    fn test_any_has_nine_methods() {
        let any = MethodSet::any();
        assert_eq!(any.len(), 9);
        assert!(any.has(&Method::TRACE));
        assert!(any.has(&Method::CONNECT));
    }

    #[test]
    fn test_empty_renders_empty() {
        assert!(MethodSet::empty().is_empty());
        assert_eq!(MethodSet::default().to_string(), "");
    }

    #[test]
    fn test_header_value() {
        let set = MethodSet::new([Method::GET, Method::HEAD, Method::OPTIONS]);
        let value = set.header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "GET, HEAD, OPTIONS");
    }
}
