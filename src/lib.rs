//! Sticky, health-aware backend selection.
//!
//! Routes calls carrying an affinity key to one of a fixed set of backend
//! instances. The same key keeps reaching the same instance while that
//! instance was `UP` at the caller's reference time.
//!
//! ```text
//! HealthMonitor (ticker) ──▶ StickyBalancer::health_check_sweep ──▶ status history per instance
//!                                                                        │
//! caller ──▶ StickyBalancer::execute(key, reference_time, action) ◀──────┘
//!                 └──▶ action(&client of selected instance)
//! ```

pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;

pub use config::BalancerConfig;
pub use health::{HealthMonitor, HealthProbe, Status};
pub use lifecycle::Shutdown;
pub use load_balancer::{BalancerError, ServiceInstance, StickyBalancer};
