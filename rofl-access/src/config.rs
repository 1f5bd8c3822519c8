//! Machine access configuration
//!
//! Defines where the scheduler lives, which provider the machine belongs to
//! and how often logs are refreshed.

use anyhow::Context;
use reqwest::Client;
use std::time::Duration;

use crate::scheduler::DEFAULT_POLL_INTERVAL;

/// Machine access configuration
#[derive(Debug, Clone)]
pub struct AccessConfig {
    /// Scheduler base URL (e.g., "https://scheduler.example.com")
    pub scheduler_url: String,

    /// Provider the machine is rented from
    pub provider: String,

    /// How often to refresh instance logs
    pub poll_interval: Duration,

    /// Per-request timeout; `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

impl AccessConfig {
    /// Creates a new configuration with defaults
    pub fn new(scheduler_url: String, provider: String) -> Self {
        Self {
            scheduler_url,
            provider,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: None,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - ROFL_SCHEDULER_URL (required)
    /// - ROFL_PROVIDER (required)
    /// - ROFL_LOG_POLL_INTERVAL (optional, seconds, default: 10)
    /// - ROFL_REQUEST_TIMEOUT (optional, seconds, default: none)
    pub fn from_env() -> anyhow::Result<Self> {
        let scheduler_url = std::env::var("ROFL_SCHEDULER_URL")
            .map_err(|_| anyhow::anyhow!("ROFL_SCHEDULER_URL environment variable not set"))?;

        let provider = std::env::var("ROFL_PROVIDER")
            .map_err(|_| anyhow::anyhow!("ROFL_PROVIDER environment variable not set"))?;

        let poll_interval = std::env::var("ROFL_LOG_POLL_INTERVAL")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let request_timeout = std::env::var("ROFL_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs);

        Ok(Self {
            scheduler_url,
            provider,
            poll_interval,
            request_timeout,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scheduler_url.is_empty() {
            anyhow::bail!("scheduler_url cannot be empty");
        }

        if !self.scheduler_url.starts_with("http://") && !self.scheduler_url.starts_with("https://")
        {
            anyhow::bail!("scheduler_url must start with http:// or https://");
        }

        if self.provider.is_empty() {
            anyhow::bail!("provider cannot be empty");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_some_and(|t| t.is_zero()) {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds the HTTP client used for scheduler requests
    pub fn http_client(&self) -> anyhow::Result<Client> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().context("Failed to build HTTP client")
    }
}
