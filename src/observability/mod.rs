//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout
//!     → Prometheus scrape (only with --metrics-address)
//! ```
//!
//! # Design Decisions
//! - Request ID flows from the HTTP layer into the dispatch span
//! - Metrics are cheap (no-op without a recorder)

pub mod logging;
pub mod metrics;
