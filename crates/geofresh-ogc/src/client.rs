//! HTTP client for a pygeoapi OGC API - Processes endpoint.
//!
//! Wraps one `reqwest::Client` (and its connection pool) together with the
//! service base URL and the polling policy. All job operations take `&self`,
//! so a single client can drive independent jobs concurrently.

use std::time::Duration;

use geofresh_core::{AppConfig, ProcessId};
use reqwest::{Client, Url};

use crate::error::ClientError;

const DEFAULT_BASE_URL: &str = "https://aqua.igb-berlin.de/pygeoapi/";

/// Timing policy for the status poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before every status request, including the first.
    pub interval: Duration,
    /// Give up once this much time has passed since submission.
    pub max_wait: Duration,
    /// Consecutive transient failures tolerated before the poll fails.
    pub max_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2_000),
            max_wait: Duration::from_secs(30 * 60),
            max_retries: 3,
        }
    }
}

impl PollConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.poll_interval_ms),
            max_wait: Duration::from_secs(config.poll_max_wait_secs),
            max_retries: config.poll_max_retries,
        }
    }
}

/// Client for one OGC API - Processes deployment.
///
/// Use [`OgcClient::new`] for the public GeoFRESH service or
/// [`OgcClient::with_base_url`] to point at another deployment or a mock
/// server in tests.
#[derive(Debug, Clone)]
pub struct OgcClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    pub(crate) poll: PollConfig,
}

impl OgcClient {
    /// Creates a client for the public GeoFRESH pygeoapi instance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, user_agent)
    }

    /// Creates a client for the pygeoapi instance at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute http(s) URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so that joining
        // "processes/..." appends to the path instead of replacing its last
        // segment.
        let normalised = format!("{}/", base_url.trim().trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            poll: PollConfig::default(),
        })
    }

    /// Builds a client from the loaded application configuration.
    ///
    /// # Errors
    ///
    /// See [`OgcClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ClientError> {
        Ok(Self::with_base_url(
            &config.service_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_poll_config(PollConfig::from_app_config(config)))
    }

    #[must_use]
    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    #[must_use]
    pub fn poll_config(&self) -> &PollConfig {
        &self.poll
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/processes/{process}/execution`.
    pub(crate) fn execution_url(&self, process: &ProcessId) -> Url {
        let mut url = self.base_url.clone();
        // Only cannot-be-a-base URLs lack segments; the constructor admits
        // http(s) only.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["processes", process.as_str(), "execution"]);
        }
        url
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
