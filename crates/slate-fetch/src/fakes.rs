//! In-memory fakes for [`DocumentFetcher`] (testing only)
//!
//! `ScriptedFetcher` answers from a URL → outcome table, records every URL it
//! was asked for, and can simulate latency while tracking how many requests
//! were in flight at once.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::FetchError;
use crate::fetcher::DocumentFetcher;
use crate::outcome::FetchOutcome;

/// Scripted fetcher; unknown URLs answer with the fallback outcome
/// (`NotFound` unless overridden).
#[derive(Debug)]
pub struct ScriptedFetcher {
    outcomes: HashMap<String, FetchOutcome>,
    fallback: FetchOutcome,
    latency: Option<Duration>,
    requests: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for ScriptedFetcher {
    fn default() -> Self {
        Self {
            outcomes: HashMap::new(),
            fallback: FetchOutcome::NotFound,
            latency: None,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `url` with `outcome`.
    pub fn with_outcome(mut self, url: impl Into<String>, outcome: FetchOutcome) -> Self {
        self.outcomes.insert(url.into(), outcome);
        self
    }

    /// Answer `url` with a successful document.
    pub fn with_document(self, url: impl Into<String>, data: Value) -> Self {
        self.with_outcome(
            url,
            FetchOutcome::Success {
                data,
                last_modified: None,
            },
        )
    }

    /// Answer `url` with a successful document and a `Last-Modified` value.
    pub fn with_document_modified(
        self,
        url: impl Into<String>,
        data: Value,
        last_modified: &str,
    ) -> Self {
        self.with_outcome(
            url,
            FetchOutcome::Success {
                data,
                last_modified: Some(last_modified.to_string()),
            },
        )
    }

    /// Answer `url` with an HTTP error status.
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        let outcome = FetchOutcome::from_status(status)
            .unwrap_or(FetchOutcome::TransientError(FetchError::Status(status)));
        self.with_outcome(url, outcome)
    }

    /// Outcome for every URL without an explicit entry.
    pub fn with_fallback(mut self, outcome: FetchOutcome) -> Self {
        self.fallback = outcome;
        self
    }

    /// Sleep this long inside every request.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Every URL requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests issued for `url`.
    pub fn request_count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|u| u.as_str() == url)
            .count()
    }

    /// Highest number of requests that were in flight simultaneously.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentFetcher for ScriptedFetcher {
    async fn fetch_raw(&self, url: &str) -> FetchOutcome {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        self.enter();
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.exit();

        self.outcomes
            .get(url)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
