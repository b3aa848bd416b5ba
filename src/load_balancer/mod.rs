//! Load balancing subsystem.
//!
//! # Data Flow
//! ```text
//! execute(key, reference_time, action)
//!     → sticky.rs (instances UP at reference_time, else all instances)
//!     → hash.rs (|stable_hash(key)| mod pool size)
//!     → instance.rs (request capability of the chosen instance)
//!     → action(capability), result returned unchanged
//! ```
//!
//! # Design Decisions
//! - Instance list is fixed at construction; no dynamic membership
//! - Routing is deterministic for a fixed history and reference time
//! - Modulo placement, not consistent hashing: a pool size change
//!   reshuffles most keys

use thiserror::Error;

use crate::http::ClientError;

pub mod factory;
pub mod hash;
pub mod instance;
pub mod sticky;

pub use hash::stable_hash;
pub use instance::ServiceInstance;
pub use sticky::StickyBalancer;

/// Errors raised while building a balancer.
#[derive(Debug, Error)]
pub enum BalancerError {
    /// A balancer needs at least one instance.
    #[error("client group '{0}' has no instances")]
    NoInstances(String),

    /// An instance URL failed to parse.
    #[error("invalid instance URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Request capability or probe client could not be built.
    #[error("client construction failed: {0}")]
    Client(#[from] ClientError),
}
