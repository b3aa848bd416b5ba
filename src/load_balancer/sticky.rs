//! Sticky, health-aware instance selection.
//!
//! # Responsibilities
//! - Route an affinity key to the same instance while it stays healthy
//! - Evaluate health as of the caller's reference time, not "now"
//! - Refresh every instance's health in one fault-isolated sweep
//!
//! # Design Decisions
//! - Selection is `|stable_hash(key)| mod |pool|` over the instances that
//!   were `UP` at the reference time (see `hash.rs`)
//! - When nothing was `UP`, fall back to the full instance list instead of
//!   failing; a total outage then surfaces as downstream errors
//! - The balancer never inspects, retries or reroutes the dispatched call
//! - Sweeps are serialised; overlapping callers wait for the running one

use std::future::Future;
use std::time::{SystemTime, UNIX_EPOCH};

use futures_util::future::join_all;
use tokio::sync::Mutex;

use crate::health::state::{HealthCheckResponse, ProbeError, Status};
use crate::load_balancer::hash;
use crate::load_balancer::instance::ServiceInstance;
use crate::load_balancer::BalancerError;
use crate::observability::metrics::{self, SelectionMode};

/// Selector and health supervisor for one client group.
#[derive(Debug)]
pub struct StickyBalancer<T> {
    name: String,
    instances: Vec<ServiceInstance<T>>,
    sweep: Mutex<()>,
}

impl<T> StickyBalancer<T> {
    /// Create a balancer over a fixed, non-empty instance list.
    pub fn new(name: impl Into<String>, instances: Vec<ServiceInstance<T>>) -> Result<Self, BalancerError> {
        let name = name.into();
        if instances.is_empty() {
            return Err(BalancerError::NoInstances(name));
        }

        Ok(Self {
            name,
            instances,
            sweep: Mutex::new(()),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instances(&self) -> &[ServiceInstance<T>] {
        &self.instances
    }

    /// Dispatch `action` against the instance selected for `key`.
    ///
    /// The action's future is returned as-is, so its output, timeout and
    /// cancellation behaviour reach the caller untouched.
    pub fn execute<'a, F, Fut>(&'a self, key: &str, reference_time: SystemTime, action: F) -> Fut
    where
        F: FnOnce(&'a T) -> Fut,
        Fut: Future,
    {
        action(self.select_client(key, reference_time))
    }

    /// Request capability of the instance selected for `key`.
    pub fn select_client(&self, key: &str, reference_time: SystemTime) -> &T {
        self.select_instance(key, reference_time).client()
    }

    /// Instance selected for `key` given health as of `reference_time`.
    pub fn select_instance(&self, key: &str, reference_time: SystemTime) -> &ServiceInstance<T> {
        let available: Vec<&ServiceInstance<T>> = self
            .instances
            .iter()
            .filter(|instance| instance.status_at(reference_time).is_up())
            .collect();

        if available.is_empty() {
            tracing::warn!(
                group = %self.name,
                key,
                reference_ms = unix_millis(reference_time),
                "No available instances at reference time, using all instances"
            );
            let index = hash::bucket(key, self.instances.len());
            let selected = &self.instances[index];
            tracing::debug!(
                instance = %selected,
                key,
                index,
                pool_size = self.instances.len(),
                "Selected instance (fallback)"
            );
            metrics::record_selection(&self.name, SelectionMode::Fallback);
            return selected;
        }

        let index = hash::bucket(key, available.len());
        let selected = available[index];
        tracing::debug!(
            instance = %selected,
            key,
            index,
            pool_size = available.len(),
            reference_ms = unix_millis(reference_time),
            "Selected instance"
        );
        metrics::record_selection(&self.name, SelectionMode::Healthy);
        selected
    }

    /// Probe every instance concurrently and record the outcomes.
    ///
    /// Never fails: probe errors become `DOWN` transitions, and one
    /// instance's failure does not affect the others.
    pub async fn health_check_sweep(&self) {
        let _running = self.sweep.lock().await;

        let checks = self.instances.iter().map(|instance| async move {
            let outcome = instance.probe().check().await;
            apply_probe_outcome(instance, outcome);
        });
        join_all(checks).await;

        tracing::debug!(group = %self.name, instances = self.instances.len(), "Health check sweep finished");
    }
}

fn apply_probe_outcome<T>(instance: &ServiceInstance<T>, outcome: Result<HealthCheckResponse, ProbeError>) {
    match outcome {
        Ok(response) => {
            tracing::debug!(instance = %instance, status = %response.status, "Health check finished");
            instance.change_status(response.status);
        }
        Err(e) if e.is_unavailable() => {
            metrics::record_probe_failure(&instance.to_string(), "unavailable");
            instance.change_status(Status::down());
            tracing::debug!(instance = %instance, "Health check finished with status=DOWN (unavailable)");
        }
        Err(e) => {
            tracing::error!(instance = %instance, error = %e, "Health check failure");
            metrics::record_probe_failure(&instance.to_string(), "error");
            instance.change_status(Status::down());
            tracing::debug!(instance = %instance, "Health check finished with status=DOWN (error)");
        }
    }
}

fn unix_millis(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}
