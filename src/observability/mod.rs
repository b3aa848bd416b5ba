//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Selection, sweeps and status transitions produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters and gauges)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`instance`, `group`, `key`) instead of formatted text
//! - Metric updates are no-ops until an exporter is installed, so the
//!   library can be used without one

pub mod logging;
pub mod metrics;
