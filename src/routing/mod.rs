//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     (MethodSet, pattern, handler)
//!     → path.rs (normalize, split into segments)
//!     → router.rs (walk/extend the tree, placeholders collapse to one wildcard child)
//!     → entry.rs (bind handler per method, cache allowed methods)
//!
//! Lookup (per request):
//!     request path
//!     → path.rs (normalize, split into segments)
//!     → router.rs (exact child first, then wildcard; deepest entry wins)
//!     → matcher.rs (RouteMatch: entry + captured values) or no match
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable once served
//! - No regex: every step is a map lookup on one segment
//! - Deterministic: registration order never changes the result

pub mod entry;
pub mod error;
pub mod matcher;
pub mod method;
pub mod path;
pub mod router;

pub use entry::RouteEntry;
pub use error::RouteError;
pub use matcher::RouteMatch;
pub use method::MethodSet;
pub use router::RouteTree;
