//! Route registration errors.

use axum::http::Method;
use thiserror::Error;

/// A configuration error found while registering a route.
///
/// These are programming errors: startup should fail rather than serve a
/// partial route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("empty method set for pattern {pattern:?}")]
    EmptyMethodSet { pattern: String },

    #[error("empty route pattern")]
    EmptyPattern,

    #[error("wildcard must be the final segment in pattern {pattern:?}")]
    MisplacedWildcard { pattern: String },

    /// `:name` and `*name` at the same position would share one route.
    #[error("pattern {pattern:?} conflicts with {existing:?}: a parameter and a wildcard cannot share a position")]
    ConflictingWildcard { pattern: String, existing: String },

    #[error("multiple registrations for {method} {pattern}")]
    Duplicate { method: Method, pattern: String },
}
