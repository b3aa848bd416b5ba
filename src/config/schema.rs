//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a balancer
//! group. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration for one sticky client group.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BalancerConfig {
    /// Logical client group name, used in logs and metrics.
    pub group: String,

    /// Ordered instance list. Order is kept for diagnostics.
    pub instances: Vec<InstanceConfig>,

    /// Health check settings.
    pub health_check: HealthCheckConfig,

    /// Request capability timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for BalancerConfig {
    fn default() -> Self {
        Self {
            group: "default".to_string(),
            instances: vec![
                InstanceConfig::new("http://localhost:9091", "http://localhost:9091"),
                InstanceConfig::new("http://localhost:9092", "http://localhost:9092"),
            ],
            health_check: HealthCheckConfig::default(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// A single backend instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InstanceConfig {
    /// Base URL business requests are sent to.
    pub service_url: String,

    /// Base URL the health path is appended to.
    pub health_check_url: String,
}

impl InstanceConfig {
    pub fn new(service_url: impl Into<String>, health_check_url: impl Into<String>) -> Self {
        Self {
            service_url: service_url.into(),
            health_check_url: health_check_url.into(),
        }
    }
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckConfig {
    /// Enable the periodic health sweep.
    pub enabled: bool,

    /// Sweep interval in seconds.
    pub interval_secs: u64,

    /// Per-probe timeout in seconds.
    pub timeout_secs: u64,

    /// Path appended to each `health_check_url`.
    pub path: String,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 15,
            timeout_secs: 5,
            path: "/actuator/health".to_string(),
        }
    }
}

/// Timeouts applied by the HTTP request capability.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in milliseconds.
    pub connect_ms: u64,

    /// Per-read timeout in milliseconds.
    pub read_ms: u64,

    /// Total request timeout in milliseconds.
    pub request_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: 5_000,
            read_ms: 10_000,
            request_ms: 30_000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BalancerConfig::default();
        assert_eq!(config.group, "default");
        assert_eq!(config.instances.len(), 2);
        assert_eq!(config.health_check.interval_secs, 15);
        assert_eq!(config.health_check.path, "/actuator/health");
        assert_eq!(config.timeouts.connect_ms, 5_000);
        assert!(!config.observability.metrics_enabled);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: BalancerConfig = toml::from_str(
            r#"
            group = "PaymentClient"

            [[instances]]
            service_url = "http://10.0.0.1:9091"
            health_check_url = "http://10.0.0.1:9191"

            [health_check]
            interval_secs = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.group, "PaymentClient");
        assert_eq!(config.instances, vec![InstanceConfig::new("http://10.0.0.1:9091", "http://10.0.0.1:9191")]);
        assert_eq!(config.health_check.interval_secs, 5);
        assert_eq!(config.health_check.timeout_secs, 5);
        assert_eq!(config.timeouts.read_ms, 10_000);
    }
}
