//! HTTP request capability bound to one instance.
//!
//! # Responsibilities
//! - Issue JSON requests against the instance base URL
//! - Apply connect/read/request timeouts from configuration
//! - Classify failures (503 unavailable, other status, timeout, transport, decode)
//!
//! # Design Decisions
//! - No retries here: failures reach the `execute` caller unchanged
//! - One connection pool per instance

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::config::TimeoutConfig;
use crate::http::join_path;

/// Errors returned by `HttpServiceClient`.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Instance answered 503.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Instance answered with another non-success status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    /// Response body did not match the expected type.
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

/// JSON-over-HTTP client for a single instance.
#[derive(Debug, Clone)]
pub struct HttpServiceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpServiceClient {
    pub fn new(base_url: &Url, timeouts: &TimeoutConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(timeouts.connect_ms))
            .read_timeout(Duration::from_millis(timeouts.read_ms))
            .timeout(Duration::from_millis(timeouts.request_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET {base}{path}` and decode the JSON body.
    pub async fn get_json<R>(&self, path: &str) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        let url = join_path(&self.base_url, path)?;
        let response = self.client.get(url).send().await?;
        decode(response).await
    }

    /// `POST {base}{path}` with a JSON body and decode the JSON response.
    pub async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R, ClientError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = join_path(&self.base_url, path)?;
        let response = self.client.post(url).json(body).send().await?;
        decode(response).await
    }
}

async fn decode<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, ClientError> {
    let status = response.status();
    if status == StatusCode::SERVICE_UNAVAILABLE {
        return Err(ClientError::Unavailable(response.url().to_string()));
    }
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_keeps_base_url() {
        let base = Url::parse("http://localhost:9091").unwrap();
        let client = HttpServiceClient::new(&base, &TimeoutConfig::default()).unwrap();
        assert_eq!(client.base_url(), &base);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(ClientError::Status(404).to_string(), "unexpected HTTP status 404");
        assert_eq!(ClientError::Timeout.to_string(), "request timed out");
    }
}
