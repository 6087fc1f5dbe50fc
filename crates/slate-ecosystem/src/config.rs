//! Loader configuration
//!
//! The loader exposes two knobs: where documents live and how far back an
//! optional document may be searched. Both default to constants and can be
//! overridden per loader, so tests can point at a fake origin.

use std::time::Duration;

use slate_fetch::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_USER_AGENT};
use tracing::warn;

use crate::error::{LoaderError, LoaderResult};

/// Default origin hosting the date-keyed documents.
pub const DEFAULT_BASE_URL: &str = "https://data.slate-ecosystem.dev/nba";

/// Default number of dates an optional document is searched across.
pub const DEFAULT_MAX_LOOKBACK_DAYS: u32 = 30;

/// Environment variable overriding [`DEFAULT_BASE_URL`].
pub const ENV_BASE_URL: &str = "SLATE_BASE_URL";

/// Environment variable overriding [`DEFAULT_MAX_LOOKBACK_DAYS`].
pub const ENV_MAX_LOOKBACK_DAYS: &str = "SLATE_MAX_LOOKBACK_DAYS";

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Origin under which `<date>/<filename>` documents are published
    pub base_url: String,
    /// Maximum number of dates tried per optional document
    pub max_lookback_days: u32,
    /// Per-request transport timeout
    pub request_timeout: Duration,
    /// `User-Agent` sent with every request
    pub user_agent: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_lookback_days: DEFAULT_MAX_LOOKBACK_DAYS,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl LoaderConfig {
    /// Config for a specific origin, everything else defaulted.
    pub fn new(base_url: &str) -> Self {
        LoaderConfig {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `SLATE_BASE_URL` / `SLATE_MAX_LOOKBACK_DAYS`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`LoaderConfig::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_MAX_LOOKBACK_DAYS) {
            match raw.trim().parse::<u32>() {
                Ok(days) => config.max_lookback_days = days,
                Err(e) => warn!(
                    variable = ENV_MAX_LOOKBACK_DAYS,
                    value = %raw,
                    error = %e,
                    "ignoring invalid lookback override"
                ),
            }
        }

        config
    }

    pub fn with_max_lookback_days(mut self, days: u32) -> Self {
        self.max_lookback_days = days;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    /// Check that the base origin is an absolute http(s) URL.
    pub fn validate(&self) -> LoaderResult<()> {
        let invalid = |reason: &str| LoaderError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };

        if self.base_url.trim().is_empty() {
            return Err(invalid("base URL is empty"));
        }

        let parsed = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(&e.to_string()))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(invalid("scheme must be http or https")),
        }
    }
}
