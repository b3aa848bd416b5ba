//! Health tracking subsystem.
//!
//! # Data Flow
//! ```text
//! Periodic timer (active.rs)
//!     → StickyBalancer::health_check_sweep
//!     → probe.rs (one concurrent probe per instance)
//!     → history.rs (record transition with observation time)
//!
//! Routing decision
//!     → history.rs status_at(reference_time)
//! ```
//!
//! # Design Decisions
//! - Health is a history, not a flag: routing asks for the status at a
//!   reference time so in-flight sticky flows survive a DOWN transition
//! - Health state is per-instance and never shared across processes

pub mod active;
pub mod history;
pub mod probe;
pub mod state;

pub use active::HealthMonitor;
pub use history::{StatusEntry, StatusHistory, MAX_HISTORY};
pub use probe::{HealthProbe, HttpHealthProbe};
pub use state::{HealthCheckResponse, ProbeError, Status, DOWN, UP};
