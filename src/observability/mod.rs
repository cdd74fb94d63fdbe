//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! routing / http / lifecycle
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (per-request counters and latency histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
