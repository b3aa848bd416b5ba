//! Service instance abstraction.
//!
//! # Responsibilities
//! - Represent a single backend instance of a client group
//! - Hold the request capability handed to callers
//! - Hold the health probe consulted by the sweep
//! - Track health as a time-indexed history

use std::fmt;
use std::time::SystemTime;

use url::Url;

use crate::health::history::StatusHistory;
use crate::health::probe::HealthProbe;
use crate::health::state::Status;
use crate::observability::metrics;

/// A single backend instance.
pub struct ServiceInstance<T> {
    name: String,
    url: Url,
    client: T,
    probe: Box<dyn HealthProbe>,
    history: StatusHistory,
}

impl<T> ServiceInstance<T> {
    /// Create an instance that starts `UP`.
    pub fn new(name: impl Into<String>, url: Url, client: T, probe: Box<dyn HealthProbe>) -> Self {
        Self::with_status(name, url, client, probe, Status::up())
    }

    /// Create an instance seeded with `status`.
    pub fn with_status(
        name: impl Into<String>,
        url: Url,
        client: T,
        probe: Box<dyn HealthProbe>,
        status: Status,
    ) -> Self {
        let instance = Self {
            name: name.into(),
            url,
            client,
            probe,
            history: StatusHistory::new(status),
        };
        metrics::record_instance_health(&instance.to_string(), instance.status().is_up());
        instance
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Request capability bound to this instance.
    pub fn client(&self) -> &T {
        &self.client
    }

    pub fn probe(&self) -> &dyn HealthProbe {
        self.probe.as_ref()
    }

    /// Current (latest recorded) status.
    pub fn status(&self) -> Status {
        self.history.current()
    }

    /// Status as recorded at `at`; `UP` for times before the instance existed.
    pub fn status_at(&self, at: SystemTime) -> Status {
        self.history.status_at(at)
    }

    /// Retained status labels, oldest first.
    pub fn statuses(&self) -> Vec<Status> {
        self.history.entries().into_iter().map(|entry| entry.status).collect()
    }

    pub fn history(&self) -> &StatusHistory {
        &self.history
    }

    /// Record a new status observed now.
    ///
    /// Returns true if a transition was recorded; repeating the current
    /// status is a no-op.
    pub fn change_status(&self, status: impl Into<Status>) -> bool {
        self.change_status_at(status.into(), SystemTime::now())
    }

    pub(crate) fn change_status_at(&self, status: Status, observed: SystemTime) -> bool {
        let Some(previous) = self.history.record_at(status.clone(), observed) else {
            return false;
        };

        tracing::info!(
            instance = %self,
            from = %previous,
            to = %status,
            "Health status changed"
        );
        let label = self.to_string();
        metrics::record_status_change(&label, status.as_str());
        metrics::record_instance_health(&label, status.is_up());
        true
    }
}

impl<T> fmt::Display for ServiceInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}: {}]", self.name, self.url)
    }
}

impl<T> fmt::Debug for ServiceInstance<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("name", &self.name)
            .field("url", &self.url.as_str())
            .field("status", &self.status())
            .field("history_len", &self.history.len())
            .finish()
    }
}
