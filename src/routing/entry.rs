//! Route entries: the leaves of the routing tree.

use std::collections::HashMap;
use std::fmt;

use axum::http::Method;

use super::error::RouteError;
use super::method::MethodSet;

/// Per-pattern record of method bindings and parameter metadata.
#[derive(Clone)]
pub struct RouteEntry<H> {
    pattern: String,
    params: Vec<String>,
    greedy: bool,
    handlers: HashMap<Method, H>,
    /// Bound methods in bind order, including an implicit HEAD.
    bound: MethodSet,
    /// `bound` plus OPTIONS.
    allowed: MethodSet,
    implicit_head: bool,
}

impl<H: Clone> RouteEntry<H> {
    pub(crate) fn new(pattern: &str, params: Vec<String>, greedy: bool) -> Self {
        Self {
            pattern: pattern.to_owned(),
            params,
            greedy,
            handlers: HashMap::new(),
            bound: MethodSet::default(),
            allowed: MethodSet::from(Method::OPTIONS),
            implicit_head: false,
        }
    }

    /// Bind `handler` to every method in `methods`.
    ///
    /// Nothing is bound if any method already has an explicit handler.
    pub(crate) fn bind(&mut self, methods: &MethodSet, handler: H) -> Result<(), RouteError> {
        if let Some(method) = methods.iter().find(|m| self.is_bound(m)) {
            return Err(RouteError::Duplicate {
                method: method.clone(),
                pattern: self.pattern.clone(),
            });
        }

        for method in methods {
            self.set_handler(method.clone(), handler.clone());
        }
        Ok(())
    }

    fn set_handler(&mut self, method: Method, handler: H) {
        if method == Method::HEAD {
            self.implicit_head = false;
        }

        if method == Method::GET && !self.handlers.contains_key(&Method::HEAD) {
            self.handlers.insert(Method::HEAD, handler.clone());
            self.implicit_head = true;
            self.bound = std::mem::take(&mut self.bound)
                .add(Method::GET)
                .add(Method::HEAD);
        } else {
            self.bound = std::mem::take(&mut self.bound).add(method.clone());
        }

        self.handlers.insert(method, handler);
        self.allowed = self.bound.clone().add(Method::OPTIONS);
    }
}

impl<H> RouteEntry<H> {
    /// The pattern text as first registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Placeholder names in pattern order; an unnamed wildcard is `""`.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// True if the pattern ends in a wildcard.
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }

    /// Every method this entry answers, OPTIONS included.
    pub fn methods(&self) -> &MethodSet {
        &self.allowed
    }

    pub fn handler(&self, method: &Method) -> Option<&H> {
        self.handlers.get(method)
    }

    /// True if `method` has an explicit binding. An implicit HEAD does not count.
    pub fn is_bound(&self, method: &Method) -> bool {
        self.handlers.contains_key(method) && !(*method == Method::HEAD && self.implicit_head)
    }
}

impl<H> fmt::Debug for RouteEntry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .field("greedy", &self.greedy)
            .field("methods", &self.allowed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> RouteEntry<&'static str> {
        RouteEntry::new("/users", Vec::new(), false)
    }

    #[test]
    fn test_get_binds_implicit_head() {
        let mut e = entry();
        e.bind(&Method::GET.into(), "list").unwrap();

        assert_eq!(e.handler(&Method::HEAD), Some(&"list"));
        assert_eq!(e.methods().to_string(), "GET, HEAD, OPTIONS");
        assert!(!e.is_bound(&Method::HEAD));
    }

    #[test]
    fn test_explicit_head_replaces_implicit() {
        let mut e = entry();
        e.bind(&Method::GET.into(), "list").unwrap();
        e.bind(&Method::HEAD.into(), "head").unwrap();

        assert_eq!(e.handler(&Method::HEAD), Some(&"head"));
        assert_eq!(e.handler(&Method::GET), Some(&"list"));
        assert_eq!(e.methods().to_string(), "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_explicit_head_before_get_is_kept() {
        let mut e = entry();
        e.bind(&Method::HEAD.into(), "head").unwrap();
        e.bind(&Method::GET.into(), "list").unwrap();

        assert_eq!(e.handler(&Method::HEAD), Some(&"head"));
        assert_eq!(e.methods().to_string(), "HEAD, GET, OPTIONS");
    }

    #[test]
    fn test_duplicate_leaves_entry_untouched() {
        let mut e = entry();
        e.bind(&Method::POST.into(), "create").unwrap();

        let err = e
            .bind(&MethodSet::new([Method::PUT, Method::POST]), "other")
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::Duplicate {
                method: Method::POST,
                pattern: "/users".into()
            }
        );
        assert_eq!(e.handler(&Method::PUT), None);
        assert_eq!(e.handler(&Method::POST), Some(&"create"));
    }

    #[test]
    fn test_options_always_allowed() {
        let e = entry();
        assert_eq!(e.methods().to_string(), "OPTIONS");

        let mut e = entry();
        e.bind(&MethodSet::new([Method::OPTIONS, Method::DELETE]), "h")
            .unwrap();
        assert_eq!(e.methods().to_string(), "OPTIONS, DELETE");
    }
}
