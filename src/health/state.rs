//! Instance health state.
//!
//! # States
//! - `UP`: instance is eligible for sticky selection
//! - `DOWN`: instance is excluded (set on any probe failure)
//! - any other label reported by the instance (`OUT_OF_SERVICE`, `UNKNOWN`, ...)
//!   is kept verbatim and treated as ineligible
//!
//! # State Transitions
//! ```text
//! probe ok(label)           → label
//! probe failed (503)        → DOWN
//! probe failed (any other)  → DOWN
//! ```
//!
//! # Design Decisions
//! - Labels are opaque strings; only the exact label `UP` is eligible
//! - Labels are reference counted so history snapshots clone cheaply

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Label an instance reports when it accepts traffic.
pub const UP: &str = "UP";

/// Label recorded whenever a probe fails.
pub const DOWN: &str = "DOWN";

/// A health status label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Status(Arc<str>);

impl Status {
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        Self(label.into())
    }

    pub fn up() -> Self {
        Self::new(UP)
    }

    pub fn down() -> Self {
        Self::new(DOWN)
    }

    /// Return true only for the exact label `UP`.
    pub fn is_up(&self) -> bool {
        &*self.0 == UP
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::up()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Status {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Status {
    fn from(label: String) -> Self {
        Self::new(label)
    }
}

impl PartialEq<str> for Status {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Status {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Body returned by an instance health endpoint, e.g. `{"status": "UP"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HealthCheckResponse {
    /// Reported status label. Missing field decodes as an empty label.
    #[serde(default)]
    pub status: String,
}

/// Errors produced by a health probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The instance explicitly reported itself unavailable (HTTP 503).
    #[error("instance unavailable: {0}")]
    Unavailable(String),

    /// The probe did not complete in time.
    #[error("health check timed out")]
    Timeout,

    /// Connection or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status other than 503.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u16),

    /// Response body was not a health payload.
    #[error("malformed health response: {0}")]
    Malformed(String),
}

impl ProbeError {
    /// Return true when the instance itself reported unavailability.
    ///
    /// This is the expected signal of a draining instance and is logged at
    /// debug level, while every other failure is logged as an error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProbeError::Unavailable(_))
    }
}

impl From<reqwest::Error> for ProbeError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProbeError::Timeout
        } else if e.is_decode() {
            ProbeError::Malformed(e.to_string())
        } else {
            ProbeError::Transport(e.to_string())
        }
    }
}
