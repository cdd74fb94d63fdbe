//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store registered patterns as a tree keyed by path segment
//! - Resolve a request path to the most specific registered pattern
//! - Return a match or an explicit no-match
//!
//! # Design Decisions
//! - One literal child per segment text, at most one wildcard child per node
//! - `:name` and `*name` share the wildcard child; only the entry remembers which
//! - Exact beats wildcard at every depth, deeper beats shallower; no ranking pass
//! - Registration needs `&mut self`, lookup only `&self`

use std::collections::HashMap;
use std::sync::Arc;

use super::entry::RouteEntry;
use super::error::RouteError;
use super::matcher::RouteMatch;
use super::method::MethodSet;
use super::path::{next_segment, normalize, Segment};

/// A single node in the routing tree.
struct Node<H> {
    children: HashMap<String, Node<H>>,
    wildcard: Option<Box<Node<H>>>,
    entry: Option<Arc<RouteEntry<H>>>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            wildcard: None,
            entry: None,
        }
    }
}

impl<H> Node<H> {
    fn collect<'a>(&'a self, out: &mut Vec<&'a RouteEntry<H>>) {
        if let Some(entry) = &self.entry {
            out.push(entry);
        }
        for child in self.children.values() {
            child.collect(out);
        }
        if let Some(wildcard) = &self.wildcard {
            wildcard.collect(out);
        }
    }
}

/// A wildcard entry passed during a walk, able to absorb the rest of the path.
struct Greedy<'a, H> {
    entry: &'a Arc<RouteEntry<H>>,
    /// Values captured before the wildcard segment.
    captured: usize,
    /// Byte offset of the wildcard segment in the normalized path.
    from: usize,
}

/// The routing tree.
pub struct RouteTree<H> {
    root: Node<H>,
}

impl<H> Default for RouteTree<H> {
    fn default() -> Self {
        Self {
            root: Node::default(),
        }
    }
}

impl<H: Clone> RouteTree<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every method in `methods` on `pattern`.
    pub fn register(
        &mut self,
        methods: &MethodSet,
        pattern: &str,
        handler: H,
    ) -> Result<(), RouteError> {
        if methods.is_empty() {
            return Err(RouteError::EmptyMethodSet {
                pattern: pattern.to_owned(),
            });
        }
        if pattern.is_empty() {
            return Err(RouteError::EmptyPattern);
        }

        let path = normalize(pattern);
        let mut rest: &str = &path;
        let mut params = Vec::new();
        let mut greedy = false;
        let mut current = &mut self.root;

        while !rest.is_empty() {
            let (head, tail) = next_segment(rest);

            current = match Segment::parse(head) {
                Segment::Literal(text) => current.children.entry(text.to_owned()).or_default(),
                Segment::Param(name) => {
                    params.push(name.to_owned());
                    &mut **current.wildcard.get_or_insert_with(Box::default)
                }
                Segment::Wildcard(name) => {
                    if !tail.is_empty() {
                        return Err(RouteError::MisplacedWildcard {
                            pattern: pattern.to_owned(),
                        });
                    }
                    greedy = true;
                    params.push(name.to_owned());
                    &mut **current.wildcard.get_or_insert_with(Box::default)
                }
            };
            rest = tail;
        }

        let entry = current
            .entry
            .get_or_insert_with(|| Arc::new(RouteEntry::new(pattern, params, greedy)));

        if entry.is_greedy() != greedy {
            return Err(RouteError::ConflictingWildcard {
                pattern: pattern.to_owned(),
                existing: entry.pattern().to_owned(),
            });
        }

        if entry.pattern() != pattern {
            tracing::warn!(
                pattern = %pattern,
                existing = %entry.pattern(),
                "Pattern shares a route entry with an earlier pattern"
            );
        }

        Arc::make_mut(entry).bind(methods, handler)?;

        tracing::debug!(methods = %methods, pattern = %pattern, "Route registered");
        Ok(())
    }
}

impl<H> RouteTree<H> {
    /// Find the entry matching `path`.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<H>> {
        let mut found = RouteMatch::default();
        self.lookup_into(path, &mut found).then_some(found)
    }

    /// Find the entry matching `path`, reusing `found`.
    ///
    /// `found` is reset first. Returns true on a match.
    pub fn lookup_into(&self, path: &str, found: &mut RouteMatch<H>) -> bool {
        found.reset();

        let path = normalize(path);
        let mut rest: &str = &path;
        let mut current = &self.root;
        let mut last: Option<(&Arc<RouteEntry<H>>, usize)> = None;
        let mut greedy: Option<Greedy<'_, H>> = None;

        while !rest.is_empty() {
            let from = path.len() - rest.len() + 1;
            let (head, tail) = next_segment(rest);

            current = match current.children.get(head) {
                Some(child) => child,
                None => match current.wildcard.as_deref() {
                    // A placeholder takes an empty segment unless it is the last one.
                    Some(child) if !head.is_empty() || !tail.is_empty() => {
                        found.values.push(head.to_owned());
                        child
                    }
                    // Dead end: only a wildcard passed on the way can take the rest.
                    _ => {
                        return match greedy {
                            Some(g) => {
                                absorb(found, &path, g);
                                true
                            }
                            None => false,
                        }
                    }
                },
            };
            rest = tail;

            if let Some(entry) = &current.entry {
                last = Some((entry, found.values.len()));
                if entry.is_greedy() {
                    greedy = Some(Greedy {
                        entry,
                        captured: found.values.len().saturating_sub(1),
                        from,
                    });
                }
            }
        }

        match (last, greedy) {
            (Some((entry, _)), Some(g)) if entry.is_greedy() => {
                absorb(found, &path, g);
                true
            }
            (Some((entry, captured)), _) => {
                found.values.truncate(captured);
                found.entry = Some(Arc::clone(entry));
                true
            }
            (None, _) => false,
        }
    }

    /// All registered entries, sorted by pattern.
    pub fn routes(&self) -> Vec<&RouteEntry<H>> {
        let mut out = Vec::new();
        self.root.collect(&mut out);
        out.sort_by(|a, b| a.pattern().cmp(b.pattern()));
        out
    }
}

/// Bind `found` to a greedy entry whose last value is the rest of `path`.
fn absorb<H>(found: &mut RouteMatch<H>, path: &str, greedy: Greedy<'_, H>) {
    let rest = &path[greedy.from..];
    let rest = rest.strip_suffix('/').unwrap_or(rest);

    found.values.truncate(greedy.captured);
    found.values.push(rest.to_owned());
    found.entry = Some(Arc::clone(greedy.entry));
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    fn tree(patterns: &[&'static str]) -> RouteTree<&'static str> {
        let mut tree = RouteTree::new();
        for pattern in patterns {
            tree.register(&Method::GET.into(), pattern, *pattern).unwrap();
        }
        tree
    }

    fn matched(patterns: &[&'static str], path: &str) -> Option<String> {
        tree(patterns).lookup(path).map(|m| m.pattern().to_string())
    }

    #[test]
    fn test_exact_literal_lookup() {
        let patterns = ["/", "/users", "/users/new", "/users/:id", "/users/:id/posts", "/files/*path"];
        for pattern in &patterns[..5] {
            assert_eq!(matched(&patterns, pattern).as_deref(), Some(*pattern));
        }
    }

    #[test]
    fn test_exact_over_prefix() {
        assert_eq!(matched(&["/users", "/users/*any"], "/users").as_deref(), Some("/users"));
    }

    #[test]
    fn test_exact_over_param() {
        let patterns = ["/users/new", "/users/:id"];
        assert_eq!(matched(&patterns, "/users/new").as_deref(), Some("/users/new"));
        assert_eq!(matched(&patterns, "/users/1").as_deref(), Some("/users/:id"));
    }

    #[test]
    fn test_exact_over_wildcard() {
        assert_eq!(
            matched(&["/users/new", "/users/*any"], "/users/new").as_deref(),
            Some("/users/new")
        );
    }

    #[test]
    fn test_trailing_slash_is_insignificant() {
        assert_eq!(matched(&["/home", "home/:page"], "/home/").as_deref(), Some("/home"));
        assert_eq!(matched(&["/home/"], "/home").as_deref(), Some("/home/"));
    }

    #[test]
    fn test_root_path() {
        assert_eq!(matched(&["/", "/users"], "/").as_deref(), Some("/"));
        assert_eq!(matched(&["/", "/users"], "").as_deref(), Some("/"));
    }

    #[test]
    fn test_root_is_not_a_prefix() {
        assert_eq!(matched(&["/"], "/users"), None);
        assert_eq!(matched(&["/", "/:foo/bar/baz"], "/1/bar"), None);
    }

    #[test]
    fn test_params_over_prefix_wildcard() {
        assert_eq!(
            matched(&["/assets/*", "/assets/:kind/:name"], "/assets/js/app.js").as_deref(),
            Some("/assets/:kind/:name")
        );
    }

    #[test]
    fn test_wildcard_needs_a_segment() {
        assert_eq!(matched(&["/users/*any"], "/users/"), None);
        assert_eq!(matched(&["/users/*any"], "/users"), None);
    }

    #[test]
    fn test_param_captures_empty_inner_segment() {
        let t = tree(&["/a/:x/b"]);
        let m = t.lookup("/a//b").unwrap();
        assert_eq!(m.pattern(), "/a/:x/b");
        assert_eq!(m.param("x"), "");
        assert_eq!(m.values(), [""]);
    }

    #[test]
    fn test_param_does_not_capture_empty_final_segment() {
        assert_eq!(matched(&["/:x"], "/"), None);
        assert_eq!(matched(&["/a/:x"], "/a//"), None);
    }

    #[test]
    fn test_param_then_wildcard_conflict() {
        let mut t = RouteTree::new();
        t.register(&Method::GET.into(), "/users/:id", "show").unwrap();

        let err = t
            .register(&Method::POST.into(), "/users/*rest", "upload")
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::ConflictingWildcard {
                pattern: "/users/*rest".into(),
                existing: "/users/:id".into(),
            }
        );

        assert_eq!(t.lookup("/users/a/b").map(|m| m.pattern().to_owned()), None);
        let m = t.lookup("/users/a").unwrap();
        assert_eq!(m.handler(&Method::POST), None);
        assert_eq!(m.values(), ["a"]);
    }

    #[test]
    fn test_wildcard_then_param_conflict() {
        let mut t = RouteTree::new();
        t.register(&Method::POST.into(), "/users/*rest", "upload").unwrap();

        let err = t
            .register(&Method::GET.into(), "/users/:id", "show")
            .unwrap_err();
        assert_eq!(
            err,
            RouteError::ConflictingWildcard {
                pattern: "/users/:id".into(),
                existing: "/users/*rest".into(),
            }
        );

        let m = t.lookup("/users/a/b").unwrap();
        assert_eq!(m.handler(&Method::GET), None);
        assert_eq!(m.handler(&Method::POST), Some(&"upload"));
        assert_eq!(m.param("rest"), "a/b");
    }

    #[test]
    fn test_shallower_entry_wins_when_walk_ends_early() {
        let t = tree(&["/users", "/users/:id/posts/:post"]);
        let m = t.lookup("/users/1/posts").unwrap();
        assert_eq!(m.pattern(), "/users");
        assert!(m.values().is_empty());
    }

    #[test]
    fn test_dead_end_is_no_match() {
        assert_eq!(matched(&["/users", "/users/new"], "/users/1"), None);
    }

    #[test]
    fn test_param_capture() {
        let t = tree(&["/users/:user/posts/:post"]);
        let m = t.lookup("/users/1/posts/2").unwrap();
        assert_eq!(m.param("user"), "1");
        assert_eq!(m.param("post"), "2");
    }

    #[test]
    fn test_wildcard_capture() {
        let t = tree(&["/images/*img"]);
        assert_eq!(t.lookup("/images/123").unwrap().param("img"), "123");
        assert_eq!(t.lookup("/images/123/456").unwrap().param("img"), "123/456");
        assert_eq!(t.lookup("/images/123/456/").unwrap().param("img"), "123/456");
    }

    #[test]
    fn test_named_and_wildcard_capture() {
        let t = tree(&["/users/:user/images/*img"]);
        let m = t.lookup("/users/1/images/123/456").unwrap();
        assert_eq!(m.param("user"), "1");
        assert_eq!(m.param("img"), "123/456");
        assert_eq!(m.values().len(), m.param_names().len());
    }

    #[test]
    fn test_wildcard_absorbs_after_partial_deeper_walk() {
        let t = tree(&["/files/*path", "/files/:dir/index"]);
        let m = t.lookup("/files/docs/readme").unwrap();
        assert_eq!(m.pattern(), "/files/*path");
        assert_eq!(m.param("path"), "docs/readme");

        let m = t.lookup("/files/docs/index").unwrap();
        assert_eq!(m.pattern(), "/files/:dir/index");
        assert_eq!(m.param("dir"), "docs");
    }

    #[test]
    fn test_wildcard_absorbs_when_path_ends_past_it() {
        let t = tree(&["/assets/*", "/assets/:kind/:name/meta"]);
        let m = t.lookup("/assets/js/app.js").unwrap();
        assert_eq!(m.pattern(), "/assets/*");
        assert_eq!(m.values(), ["js/app.js"]);
    }

    #[test]
    fn test_method_sets() {
        let mut t = RouteTree::new();
        t.register(&Method::GET.into(), "/users", "list").unwrap();
        t.register(&Method::POST.into(), "/users", "create").unwrap();
        t.register(&MethodSet::new([Method::PUT, Method::PATCH]), "/users/:id", "update")
            .unwrap();

        let m = t.lookup("/users").unwrap();
        assert_eq!(m.handler(&Method::GET), Some(&"list"));
        assert_eq!(m.handler(&Method::HEAD), Some(&"list"));
        assert_eq!(m.handler(&Method::POST), Some(&"create"));
        assert_eq!(m.methods().to_string(), "GET, HEAD, POST, OPTIONS");

        let m = t.lookup("/users/7").unwrap();
        assert_eq!(m.handler(&Method::PUT), Some(&"update"));
        assert_eq!(m.handler(&Method::PATCH), Some(&"update"));
        assert_eq!(m.handler(&Method::GET), None);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut t = tree(&["/users"]);
        let err = t.register(&Method::GET.into(), "/users", "again").unwrap_err();
        assert!(matches!(err, RouteError::Duplicate { .. }));

        // Different names, same shape: still the same route.
        let mut t = tree(&["/users/:id"]);
        let err = t.register(&Method::GET.into(), "/users/:name", "again").unwrap_err();
        assert_eq!(
            err,
            RouteError::Duplicate {
                method: Method::GET,
                pattern: "/users/:id".into()
            }
        );
    }

    #[test]
    fn test_invalid_registrations() {
        let mut t: RouteTree<&str> = RouteTree::new();
        assert_eq!(
            t.register(&MethodSet::default(), "/users", "h"),
            Err(RouteError::EmptyMethodSet { pattern: "/users".into() })
        );
        assert_eq!(t.register(&Method::GET.into(), "", "h"), Err(RouteError::EmptyPattern));
        assert_eq!(
            t.register(&Method::GET.into(), "/files/*path/meta", "h"),
            Err(RouteError::MisplacedWildcard {
                pattern: "/files/*path/meta".into()
            })
        );
        assert!(t.routes().is_empty());
    }

    #[test]
    fn test_lookup_into_reuses_match() {
        let t = tree(&["/users/:id", "/about"]);
        let mut m = RouteMatch::default();

        assert!(t.lookup_into("/users/1", &mut m));
        assert_eq!(m.param("id"), "1");

        assert!(t.lookup_into("/about", &mut m));
        assert_eq!(m.pattern(), "/about");
        assert!(m.values().is_empty());

        assert!(!t.lookup_into("/missing", &mut m));
        assert_eq!(m.pattern(), "");
    }

    #[test]
    fn test_match_survives_later_registration() {
        let mut t = tree(&["/users"]);
        let m = t.lookup("/users").unwrap();
        t.register(&Method::POST.into(), "/users", "create").unwrap();

        assert_eq!(m.handler(&Method::POST), None);
        assert_eq!(t.lookup("/users").unwrap().handler(&Method::POST), Some(&"create"));
    }

    #[test]
    fn test_routes_sorted() {
        let t = tree(&["/users/:id", "/", "/about"]);
        let patterns: Vec<_> = t.routes().into_iter().map(RouteEntry::pattern).collect();
        assert_eq!(patterns, ["/", "/about", "/users/:id"]);
    }
}
