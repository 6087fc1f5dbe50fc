//! Document fetcher trait and its reqwest implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, LAST_MODIFIED, PRAGMA};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::outcome::FetchOutcome;

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = concat!("slate-fetch/", env!("CARGO_PKG_VERSION"));

/// Performs one fetch attempt against a fully-qualified URL.
///
/// Implementations never return `Err`: every failure is classified into a
/// [`FetchOutcome`] so callers can run many fetches side by side and decide
/// only after all of them settle.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch_raw(&self, url: &str) -> FetchOutcome;
}

/// HTTP document fetcher backed by `reqwest`.
///
/// Every request is sent with caching disabled; documents can be republished
/// during the day and a stale copy must never be served silently.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the given timeout and user agent.
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch_raw(&self, url: &str) -> FetchOutcome {
        let response = match self
            .client
            .get(url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(url = %url, error = %e, "document request failed");
                return FetchOutcome::TransientError(FetchError::from(e));
            }
        };

        let status = response.status();
        if let Some(outcome) = FetchOutcome::from_status(status.as_u16()) {
            debug!(url = %url, status = status.as_u16(), "document not usable");
            return outcome;
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(url = %url, error = %e, "failed to read document body");
                return FetchOutcome::TransientError(FetchError::from(e));
            }
        };

        let outcome = FetchOutcome::from_body(&body, last_modified);
        if let FetchOutcome::TransientError(err) = &outcome {
            warn!(url = %url, error = %err, "document body is not valid JSON");
        } else {
            debug!(url = %url, bytes = body.len(), "document fetched");
        }
        outcome
    }
}
