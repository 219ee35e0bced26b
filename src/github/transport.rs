//! GitHub HTTP transport seam.
//!
//! `GithubTransport` isolates the wire from the client logic so tests can
//! script responses. The real transport is one pooled reqwest client with
//! redirects disabled - GitHub answers renamed repositories with a 301 and
//! the client must see that status rather than silently following it.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::types::GithubError;

/// Subset of response headers the client inspects
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    /// Pagination links
    pub link: Option<String>,
    /// Redirect target on 301
    pub location: Option<String>,
    /// X-RateLimit-Remaining
    pub rate_limit_remaining: Option<u64>,
    /// X-RateLimit-Reset (unix timestamp)
    pub rate_limit_reset: Option<i64>,
    /// Content-Type of the body
    pub content_type: Option<String>,
}

impl ResponseHeaders {
    /// Rate limit exhausted when the remaining counter reads exactly zero
    pub fn rate_limit_exhausted(&self) -> bool {
        self.rate_limit_remaining == Some(0)
    }
}

/// One GitHub API response: status, inspected headers, raw body
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, GithubError> {
        serde_json::from_slice(&self.body).map_err(|e| GithubError::Decode(e.to_string()))
    }

    /// Body as UTF-8 text; `None` when the bytes are not valid UTF-8
    pub fn text(&self) -> Option<String> {
        String::from_utf8(self.body.clone()).ok()
    }
}

/// Wire seam for GitHub API calls
#[async_trait]
pub trait GithubTransport: Send + Sync {
    /// GET `url` with query parameters and an Accept media type.
    /// Errors are transport-level only; HTTP error statuses come back as
    /// `ApiResponse` for the client to interpret.
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        accept: &str,
    ) -> Result<ApiResponse, GithubError>;
}

// =============================================================================
// Real Transport
// =============================================================================

/// Pooled reqwest transport.
///
/// Auth and version headers ride on every request; the token never appears
/// in Debug output.
pub struct HttpTransport {
    token: SecretString,
    client: reqwest::Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl HttpTransport {
    pub fn new(token: SecretString, timeout_secs: u64) -> Result<Self, GithubError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            // 301 on a renamed repository must surface, not be followed
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("repolens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GithubError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { token, client })
    }
}

fn header_str(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

#[async_trait]
impl GithubTransport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        accept: &str,
    ) -> Result<ApiResponse, GithubError> {
        debug!(url, "GitHub API request");

        let response = self
            .client
            .get(url)
            .query(query)
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header("Accept", accept)
            .header(
                "X-GitHub-Api-Version",
                crate::constants::github::API_VERSION,
            )
            .send()
            .await
            .map_err(|e| GithubError::Network(e.to_string()))?;

        let headers = ResponseHeaders {
            link: header_str(&response, "link"),
            location: header_str(&response, "location"),
            rate_limit_remaining: header_str(&response, "x-ratelimit-remaining")
                .and_then(|v| v.parse().ok()),
            rate_limit_reset: header_str(&response, "x-ratelimit-reset")
                .and_then(|v| v.parse().ok()),
            content_type: header_str(&response, "content-type"),
        };
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .await
            .map_err(|e| GithubError::Network(e.to_string()))?
            .to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_exhausted_requires_zero() {
        let mut headers = ResponseHeaders::default();
        assert!(!headers.rate_limit_exhausted());
        headers.rate_limit_remaining = Some(3);
        assert!(!headers.rate_limit_exhausted());
        headers.rate_limit_remaining = Some(0);
        assert!(headers.rate_limit_exhausted());
    }

    #[test]
    fn test_api_response_json_decode_error() {
        let response = ApiResponse {
            status: 200,
            headers: ResponseHeaders::default(),
            body: b"not-json".to_vec(),
        };
        let result: Result<serde_json::Value, _> = response.json();
        assert!(matches!(result, Err(GithubError::Decode(_))));
    }

    #[test]
    fn test_api_response_text_rejects_invalid_utf8() {
        let response = ApiResponse {
            status: 200,
            headers: ResponseHeaders::default(),
            body: vec![0xff, 0xfe, 0x00],
        };
        assert!(response.text().is_none());
    }

    #[test]
    fn test_transport_debug_redacts_token() {
        let transport = HttpTransport::new(SecretString::from("ghp_secret"), 30).unwrap();
        assert!(!format!("{:?}", transport).contains("ghp_secret"));
    }
}
