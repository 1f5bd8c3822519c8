//! Configuration module
//!
//! Handles CLI configuration: scheduler location, wallet identity and
//! refresh interval.

use rofl_access::AccessConfig;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the machine's scheduler
    pub scheduler_url: String,
    /// Wallet address used to sign in
    pub address: Option<String>,
    /// Chain the wallet signs for
    pub chain_id: u64,
    /// How often to refresh logs when following
    pub poll_interval: Duration,
}

impl Config {
    /// Access configuration for a machine of `provider`
    pub fn access_config(&self, provider: &str) -> anyhow::Result<AccessConfig> {
        let config = AccessConfig::new(self.scheduler_url.clone(), provider.to_string())
            .with_poll_interval(self.poll_interval);
        config.validate()?;
        Ok(config)
    }
}
