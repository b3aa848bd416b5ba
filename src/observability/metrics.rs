//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sticky_selections_total` (counter): selections by group, mode (healthy/fallback)
//! - `sticky_status_transitions_total` (counter): recorded transitions by instance, status
//! - `sticky_instance_up` (gauge): 1 when the instance's current status is UP, else 0
//! - `sticky_probe_failures_total` (counter): failed probes by instance, kind (unavailable/error)

use std::net::SocketAddr;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// How an instance was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Chosen among instances UP at the reference time.
    Healthy,
    /// No instance was UP; chosen among all instances.
    Fallback,
}

impl SelectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionMode::Healthy => "healthy",
            SelectionMode::Fallback => "fallback",
        }
    }
}

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_selection(group: &str, mode: SelectionMode) {
    metrics::counter!(
        "sticky_selections_total",
        "group" => group.to_string(),
        "mode" => mode.as_str()
    )
    .increment(1);
}

pub fn record_status_change(instance: &str, status: &str) {
    metrics::counter!(
        "sticky_status_transitions_total",
        "instance" => instance.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

pub fn record_instance_health(instance: &str, up: bool) {
    metrics::gauge!("sticky_instance_up", "instance" => instance.to_string()).set(if up { 1.0 } else { 0.0 });
}

pub fn record_probe_failure(instance: &str, kind: &'static str) {
    metrics::counter!(
        "sticky_probe_failures_total",
        "instance" => instance.to_string(),
        "kind" => kind
    )
    .increment(1);
}
