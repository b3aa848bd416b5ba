//! HTTP boundary adapters.
//!
//! # Data Flow
//! ```text
//! StickyBalancer::execute
//!     → action(&HttpServiceClient)
//!     → client.rs (base URL + path, timeouts, JSON codec)
//!     → backend instance
//! ```
//!
//! Health probes share the URL joining rules defined here.

pub mod client;

pub use client::{ClientError, HttpServiceClient};

use url::Url;

/// Append `path` to `base` as plain concatenation.
///
/// Unlike `Url::join`, an absolute `path` keeps any path prefix of `base`.
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
}
