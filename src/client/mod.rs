//! Risk Scoring API
//!
//! The scoring service is a single JSON endpoint, `POST /health-risk`. The
//! same endpoint both estimates wearable readings (when none are sent) and
//! scores the profile.
//!
//! [`RiskApi`] is the seam between the controller and the transport: the
//! native [`HttpRiskClient`] uses reqwest, the browser crate uses fetch.

#[cfg(feature = "native")]
mod http;

#[cfg(feature = "native")]
pub use http::HttpRiskClient;

use async_trait::async_trait;
use thiserror::Error;

use crate::payload::RiskRequest;
use crate::response::RiskResponse;

/// Default scoring service base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Path of the scoring endpoint
pub const RISK_ENDPOINT: &str = "/health-risk";

/// Client for the risk scoring endpoint
///
/// Futures are not required to be `Send` so that browser fetch futures can
/// implement it.
#[async_trait(?Send)]
pub trait RiskApi {
    /// Score a profile, one request per call
    async fn assess(&self, request: &RiskRequest) -> Result<RiskResponse, ClientError>;
}

/// Risk API errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Request could not be built
    #[error("Request build error: {0}")]
    Build(String),

    /// Request did not complete
    #[error("Network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,

    /// Service could not be reached
    #[error("Scoring service unavailable")]
    Unavailable,

    /// Service answered with a non-success status
    #[error("Scoring service returned status {status}")]
    Status { status: u16 },

    /// Response body was not JSON
    #[error("Parse error: {0}")]
    Decode(String),
}

/// Full endpoint URL for a base URL, ignoring a trailing slash on the base
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
