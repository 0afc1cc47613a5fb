//! reqwest client for the scoring endpoint

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{endpoint_url, ClientError, RiskApi, DEFAULT_API_BASE, RISK_ENDPOINT};
use crate::payload::RiskRequest;
use crate::response::RiskResponse;

/// HTTP client for the scoring service
#[derive(Debug, Clone)]
pub struct HttpRiskClient {
    client: Client,
    url: String,
}

impl HttpRiskClient {
    /// Client for `{base_url}{endpoint}`. Without a timeout a request waits
    /// for the server indefinitely.
    pub fn new(base_url: &str, endpoint: &str, timeout: Option<Duration>) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            client,
            url: endpoint_url(base_url, endpoint),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpRiskClient {
    fn default() -> Self {
        Self {
            client: Client::new(),
            url: endpoint_url(DEFAULT_API_BASE, RISK_ENDPOINT),
        }
    }
}

#[async_trait(?Send)]
impl RiskApi for HttpRiskClient {
    async fn assess(&self, request: &RiskRequest) -> Result<RiskResponse, ClientError> {
        tracing::debug!(url = %self.url, "Requesting health risk assessment");

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout
                } else if e.is_connect() {
                    ClientError::Unavailable
                } else {
                    ClientError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
            });
        }

        response
            .json::<RiskResponse>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}
