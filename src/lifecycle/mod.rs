//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Register routes → Bind listener → Serve
//!
//! Shutdown:
//!     signals.rs (SIGINT/SIGTERM) → shutdown.rs (broadcast) → server drains → Exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and route registration errors abort startup
//! - Listener binds last, once the route table is complete

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
