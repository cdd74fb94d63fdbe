//! Path normalization and segmentation.
//!
//! Both registration and lookup walk text one segment at a time with
//! [`next_segment`], so no intermediate segment list is allocated.

use std::borrow::Cow;

/// Returns the canonical form of `path`.
///
/// An empty path becomes `/` and a missing leading `/` is added.
pub fn normalize(path: &str) -> Cow<'_, str> {
    if path.is_empty() {
        return Cow::Borrowed("/");
    }

    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}

/// Shift the first segment off a normalized path.
///
/// Returns the segment and the remaining path. The remainder is empty when
/// no separator follows, or when only a single trailing `/` is left, so
/// `/home/` and `/home` yield the same segments. The root `/` yields one
/// empty segment.
pub fn next_segment(path: &str) -> (&str, &str) {
    let body = path.strip_prefix('/').unwrap_or(path);

    match body.find('/') {
        Some(i) => {
            let (head, tail) = body.split_at(i);
            if tail == "/" {
                (head, "")
            } else {
                (head, tail)
            }
        }
        None => (body, ""),
    }
}

/// A classified pattern segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matched verbatim, case-sensitive.
    Literal(&'a str),
    /// `:name`, captures exactly one segment.
    Param(&'a str),
    /// `*` or `*name`, captures the rest of the path. Final segment only.
    Wildcard(&'a str),
}

impl<'a> Segment<'a> {
    pub fn parse(text: &'a str) -> Self {
        if let Some(name) = text.strip_prefix(':') {
            Segment::Param(name)
        } else if let Some(name) = text.strip_prefix('*') {
            Segment::Wildcard(name)
        } else {
            Segment::Literal(text)
        }
    }
}
