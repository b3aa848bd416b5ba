//! Health probes.
//!
//! # Responsibilities
//! - Define the probe capability consulted by the health sweep
//! - Provide the HTTP implementation against `{health_check_url}{path}`
//!
//! # Design Decisions
//! - 503 is reported as `ProbeError::Unavailable` (a draining instance),
//!   every other failure keeps its own variant
//! - The probe owns its timeout; the sweep adds none

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::health::state::{HealthCheckResponse, ProbeError};
use crate::http::join_path;

/// Capability to ask an instance for its health.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> Result<HealthCheckResponse, ProbeError>;
}

/// Probe that issues `GET {base}{path}` and decodes `{"status": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpHealthProbe {
    client: reqwest::Client,
    url: Url,
    timeout: Duration,
}

impl HttpHealthProbe {
    pub fn new(
        client: reqwest::Client,
        base_url: &Url,
        path: &str,
        timeout: Duration,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            url: join_path(base_url, path)?,
            timeout,
        })
    }

    /// Endpoint this probe targets.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl HealthProbe for HttpHealthProbe {
    async fn check(&self) -> Result<HealthCheckResponse, ProbeError> {
        let response = self
            .client
            .get(self.url.clone())
            .header("user-agent", "sticky-balancer-health-check")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(ProbeError::Unavailable(format!("{} returned {}", self.url, status)));
        }
        if !status.is_success() {
            return Err(ProbeError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| ProbeError::Malformed(e.to_string()))
    }
}
