//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probe failures, reloads, response delivery problems
//!     → logging.rs (tracing subscriber, warn level for failures)
//! Probe outcomes and aggregate verdicts
//!     → metrics.rs (counters, histogram, optional Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
