//! HTTP access
//!
//! The rest of the crate only needs a plain `GET` that reports the status
//! code instead of failing on it, so that callers can decide whether a
//! non-200 answer is fatal (installer download) or soft (mirror catalog).

use crate::error::{SetupError, SetupResult};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Upper bound for a response body (the Windows installer is ~30 MB)
const MAX_BODY_BYTES: u64 = 256 * 1024 * 1024;

/// Overall timeout for one request
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Status code and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    /// Empty unless the status is 200
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Minimal HTTP client
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request.
    ///
    /// Returns `Err` only for transport failures; any HTTP status is `Ok`.
    async fn get(&self, url: &str) -> SetupResult<HttpResponse>;
}

/// `ureq`-backed client, run on the blocking thread pool
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new() -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(REQUEST_TIMEOUT))
            .build()
            .into();
        Self { agent }
    }

    fn get_blocking(agent: &ureq::Agent, url: &str) -> SetupResult<HttpResponse> {
        let mut response = agent.get(url).call().map_err(|e| SetupError::http(url, e))?;
        let status = response.status().as_u16();
        if status != 200 {
            return Ok(HttpResponse {
                status,
                body: Vec::new(),
            });
        }

        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_BODY_BYTES)
            .read_to_vec()
            .map_err(|e| SetupError::http(url, e))?;
        Ok(HttpResponse { status, body })
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for UreqClient {
    async fn get(&self, url: &str) -> SetupResult<HttpResponse> {
        debug!("GET {}", url);
        let agent = self.agent.clone();
        let owned_url = url.to_string();
        let response = tokio::task::spawn_blocking(move || Self::get_blocking(&agent, &owned_url))
            .await
            .map_err(|e| SetupError::Internal(format!("HTTP task failed: {}", e)))??;
        debug!(status = response.status, bytes = response.body.len(), "GET {} done", url);
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_ok_only_for_200() {
        let ok = HttpResponse {
            status: 200,
            body: b"x".to_vec(),
        };
        let redirect = HttpResponse {
            status: 304,
            body: Vec::new(),
        };
        assert!(ok.is_ok());
        assert!(!redirect.is_ok());
    }

    #[tokio::test]
    async fn transport_failure_is_error() {
        let client = UreqClient::new();
        // Port 9 (discard) on localhost is closed in test environments
        let result = client.get("http://127.0.0.1:9/catalog.json").await;
        assert!(matches!(result, Err(SetupError::Http { .. })));
    }
}
