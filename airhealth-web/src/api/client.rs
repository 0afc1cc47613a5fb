//! HTTP API Client
//!
//! fetch-based implementation of the risk API.

use async_trait::async_trait;
use gloo_net::http::Request;

use airhealth::client::endpoint_url;
use airhealth::{ClientError, RiskApi, RiskRequest, RiskResponse, DEFAULT_API_BASE, RISK_ENDPOINT};

/// Local storage key overriding the scoring service URL
const API_URL_KEY: &str = "airhealth_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Risk API client using the browser's fetch
pub struct FetchRiskClient {
    url: String,
}

impl FetchRiskClient {
    pub fn new(api_base: &str) -> Self {
        Self {
            url: endpoint_url(api_base, RISK_ENDPOINT),
        }
    }
}

#[async_trait(?Send)]
impl RiskApi for FetchRiskClient {
    async fn assess(&self, request: &RiskRequest) -> Result<RiskResponse, ClientError> {
        let response = Request::post(&self.url)
            .json(request)
            .map_err(|e| ClientError::Build(e.to_string()))?
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(ClientError::Status {
                status: response.status(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(RiskResponse::new(body))
    }
}
