//! Shared HTTP client with bounded timeouts and bounded bodies.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::{ExpmodError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default cap on response bodies.
pub const DEFAULT_BODY_LIMIT: usize = 1 << 20;

/// Whether a request may carry the bearer credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Third-party hosts (discovery and index pages).
    Public,
    /// The repository API and raw-content hosts.
    Authorized,
}

/// GET-only HTTP client used by every resolver and by the description fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    body_limit: usize,
    token: Option<String>,
}

impl HttpFetcher {
    /// Build a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("expmod/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ExpmodError::Transport {
                url: String::new(),
                source: e,
            })?;
        Ok(HttpFetcher {
            client,
            timeout,
            body_limit: DEFAULT_BODY_LIMIT,
            token: None,
        })
    }

    /// Attach `token` as a bearer credential to [`Access::Authorized`] requests.
    /// Empty tokens are ignored.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Cap response bodies at `limit` bytes; the rest is discarded.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// GET `url` and return its body as text.
    ///
    /// Any status other than `200 OK` is an error carrying the URL and the
    /// status text.
    pub async fn get_text(&self, url: &str, access: Access) -> Result<String> {
        debug!(url, ?access, "GET");
        let mut request = self.client.get(url);
        if access == Access::Authorized {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| ExpmodError::from_request(url, self.timeout, e))?;

        if response.status() != StatusCode::OK {
            return Err(ExpmodError::HttpStatus {
                url: url.to_string(),
                status: response.status().to_string(),
            });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| ExpmodError::from_request(url, self.timeout, e))?
        {
            let room = self.body_limit.saturating_sub(body.len());
            body.extend_from_slice(&chunk[..chunk.len().min(room)]);
            if body.len() >= self.body_limit {
                debug!(url, limit = self.body_limit, "response body truncated");
                break;
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
