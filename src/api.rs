//! Typed client for the relay server's HTTP API

use reqwest::header::CACHE_CONTROL;
use reqwest::Url;

use crate::data::{RelayConfig, RelayStatus, StateSnapshot};

/// Errors surfaced by relay API calls
#[derive(Debug, thiserror::Error)]
pub enum RelayApiError {
    /// Transport-level failure: connect, timeout, body read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered non-2xx; the message is the literal response body
    #[error("server rejected request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("failed to parse server response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid relay server URL {url:?}: {reason}")]
    BadBaseUrl { url: String, reason: String },
}

/// HTTP client for one relay server
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base: String,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Result<Self, RelayApiError> {
        Url::parse(base_url).map_err(|e| RelayApiError::BadBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http: reqwest::Client::new(),
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL of the fixed relay manifest
    pub fn manifest_url(&self) -> String {
        self.endpoint("/hls/live.m3u8")
    }

    /// Fetch the combined config + status snapshot
    pub async fn fetch_snapshot(&self) -> Result<StateSnapshot, RelayApiError> {
        let body = self.get_fresh("/api/config").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Status-only fetch used by the poller
    pub async fn fetch_status(&self) -> Result<RelayStatus, RelayApiError> {
        let body = self.get_fresh("/api/status").await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Push a collected config; the server restarts the relay on success
    pub async fn save_config(&self, config: &RelayConfig) -> Result<(), RelayApiError> {
        let response = self
            .http
            .post(self.endpoint("/api/config"))
            .json(config)
            .send()
            .await?;
        Self::read_body(response).await.map(|_| ())
    }

    /// Ask the server to start the relay with its stored config
    pub async fn start(&self) -> Result<(), RelayApiError> {
        self.action("/api/start").await
    }

    /// Ask the server to stop the relay
    pub async fn stop(&self) -> Result<(), RelayApiError> {
        self.action("/api/stop").await
    }

    /// POST with no body; the response content is not interpreted
    async fn action(&self, path: &str) -> Result<(), RelayApiError> {
        let response = self.http.post(self.endpoint(path)).send().await?;
        Self::read_body(response).await.map(|_| ())
    }

    /// GET with caches bypassed so polled state is never stale
    async fn get_fresh(&self, path: &str) -> Result<String, RelayApiError> {
        let response = self
            .http
            .get(self.endpoint(path))
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;
        Self::read_body(response).await
    }

    /// Collapse a response into its body text, mapping non-2xx to
    /// `Rejected` with the literal body so callers can show it verbatim.
    async fn read_body(response: reqwest::Response) -> Result<String, RelayApiError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(RelayApiError::Rejected {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let api = RelayClient::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(api.manifest_url(), "http://127.0.0.1:8080/hls/live.m3u8");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(RelayClient::new("not a url").is_err());
    }
}
