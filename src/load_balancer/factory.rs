//! Balancer construction from configuration.
//!
//! # Responsibilities
//! - Parse instance URLs once, in configuration order
//! - Build one HTTP health probe per instance (sharing a connection pool)
//! - Delegate request-capability construction to the caller

use std::time::Duration;

use url::Url;

use crate::config::{HealthCheckConfig, InstanceConfig};
use crate::health::probe::HttpHealthProbe;
use crate::http::ClientError;
use crate::load_balancer::instance::ServiceInstance;
use crate::load_balancer::sticky::StickyBalancer;
use crate::load_balancer::BalancerError;

impl<T> StickyBalancer<T> {
    /// Build a balancer for `name` from `(service_url, health_check_url)` pairs.
    ///
    /// `make_client` turns each service URL into the request capability
    /// handed to `execute` actions.
    pub fn from_config<F, E>(
        name: impl Into<String>,
        instances: &[InstanceConfig],
        health_check: &HealthCheckConfig,
        mut make_client: F,
    ) -> Result<Self, BalancerError>
    where
        F: FnMut(&Url) -> Result<T, E>,
        E: Into<BalancerError>,
    {
        let name = name.into();
        let probe_client = reqwest::Client::builder()
            .build()
            .map_err(ClientError::from)?;
        let timeout = Duration::from_secs(health_check.timeout_secs);

        let mut built = Vec::with_capacity(instances.len());
        for config in instances {
            let service_url = parse_url(&config.service_url)?;
            let health_url = parse_url(&config.health_check_url)?;

            let probe = HttpHealthProbe::new(probe_client.clone(), &health_url, &health_check.path, timeout)
                .map_err(|source| BalancerError::InvalidUrl {
                    url: config.health_check_url.clone(),
                    source,
                })?;
            let client = make_client(&service_url).map_err(Into::<BalancerError>::into)?;

            let instance = ServiceInstance::new(name.clone(), service_url, client, Box::new(probe));
            tracing::info!(
                instance = %instance,
                health_url = %health_url,
                timeout_secs = health_check.timeout_secs,
                "Initialized service instance"
            );
            built.push(instance);
        }

        Self::new(name, built)
    }
}

fn parse_url(raw: &str) -> Result<Url, BalancerError> {
    Url::parse(raw).map_err(|source| BalancerError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(service: &str, health: &str) -> InstanceConfig {
        InstanceConfig {
            service_url: service.to_string(),
            health_check_url: health.to_string(),
        }
    }

    #[test]
    fn test_builds_instances_in_order() {
        let configs = vec![
            pair("http://localhost:9091", "http://localhost:9091"),
            pair("http://localhost:9092", "http://localhost:9192"),
        ];
        let lb = StickyBalancer::from_config("PaymentClient", &configs, &HealthCheckConfig::default(), |url| {
            Ok::<_, BalancerError>(url.port())
        })
        .unwrap();

        assert_eq!(lb.name(), "PaymentClient");
        let ports: Vec<_> = lb.instances().iter().map(|i| *i.client()).collect();
        assert_eq!(ports, vec![Some(9091), Some(9092)]);
        assert_eq!(lb.instances()[1].to_string(), "[PaymentClient: http://localhost:9092/]");
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let configs = vec![pair("not a url", "http://localhost:9091")];
        let err = StickyBalancer::from_config("c", &configs, &HealthCheckConfig::default(), |_| {
            Ok::<_, BalancerError>(())
        })
        .unwrap_err();
        assert!(matches!(err, BalancerError::InvalidUrl { ref url, .. } if url == "not a url"));
    }

    #[test]
    fn test_empty_config_is_rejected() {
        let err = StickyBalancer::from_config("c", &[], &HealthCheckConfig::default(), |_| {
            Ok::<_, BalancerError>(())
        })
        .unwrap_err();
        assert!(matches!(err, BalancerError::NoInstances(_)));
    }

    #[test]
    fn test_client_errors_propagate() {
        let configs = vec![pair("http://localhost:9091", "http://localhost:9091")];
        let err = StickyBalancer::<()>::from_config("c", &configs, &HealthCheckConfig::default(), |_| {
            Err(ClientError::Transport("boom".into()))
        })
        .unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
