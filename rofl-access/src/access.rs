//! Machine access
//!
//! Composes credential acquisition and log polling into one operation:
//! make sure a session token is cached, then refresh the instance logs.
//! The first access signs in; later accesses only refresh.

use reqwest::Client;
use std::sync::Arc;
use tokio::sync::{Mutex, watch};
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AccessConfig;
use crate::error::{AccessError, Result};
use crate::scheduler::{LogPoller, LogState, LogTarget};
use crate::service::CredentialService;
use crate::token_cache::TokenCache;

/// Authenticated access to one machine instance's logs
pub struct MachineAccess {
    credentials: Arc<dyn CredentialService>,
    scheduler_url: Option<String>,
    provider: String,
    tokens: TokenCache,
    poller: LogPoller,
    /// Serializes sign-in so concurrent first accesses prompt the wallet once
    acquire_lock: Mutex<()>,
}

impl MachineAccess {
    /// Creates machine access for `target`, polling every `interval`
    ///
    /// # Arguments
    /// * `credentials` - Service used to sign in when no token is cached
    /// * `target` - Scheduler endpoint and instance to fetch logs for
    /// * `provider` - Provider identifier shown in the sign-in message
    /// * `tokens` - Token cache; may already hold a token to skip sign-in
    /// * `interval` - Automatic refresh interval, must be non-zero
    ///
    /// No logs are fetched until the first [`Self::access`] or tick, even
    /// when `tokens` is seeded.
    pub fn new(
        credentials: Arc<dyn CredentialService>,
        target: LogTarget,
        provider: impl Into<String>,
        tokens: TokenCache,
        interval: Duration,
    ) -> Result<Self> {
        let scheduler_url = target.scheduler_url.clone();
        let poller = LogPoller::start(target, tokens.clone(), interval, Client::new(), false)?;
        Ok(Self::with_poller(
            credentials,
            scheduler_url,
            provider,
            tokens,
            poller,
        ))
    }

    /// Creates machine access from configuration
    pub fn from_config(
        config: &AccessConfig,
        instance_id: &str,
        credentials: Arc<dyn CredentialService>,
        tokens: TokenCache,
    ) -> anyhow::Result<Self> {
        let target = LogTarget::new(Some(config.scheduler_url.clone()), instance_id);
        let poller = LogPoller::start(
            target,
            tokens.clone(),
            config.poll_interval,
            config.http_client()?,
            false,
        )?;

        Ok(Self::with_poller(
            credentials,
            Some(config.scheduler_url.clone()),
            config.provider.clone(),
            tokens,
            poller,
        ))
    }

    fn with_poller(
        credentials: Arc<dyn CredentialService>,
        scheduler_url: Option<String>,
        provider: impl Into<String>,
        tokens: TokenCache,
        poller: LogPoller,
    ) -> Self {
        Self {
            credentials,
            scheduler_url,
            provider: provider.into(),
            tokens,
            poller,
            acquire_lock: Mutex::new(()),
        }
    }

    /// Signs in if needed, then triggers a log refresh
    ///
    /// Sign-in failures are returned and no logs are fetched. The refresh
    /// itself runs on the poller task; its outcome shows up in [`Self::logs`].
    pub async fn access(&self) -> Result<()> {
        if self.tokens.is_empty() {
            let _guard = self.acquire_lock.lock().await;

            if self.tokens.is_empty() {
                info!(provider = %self.provider, "No session token cached, signing in");
                let token = self
                    .credentials
                    .acquire(self.scheduler_url.as_deref(), &self.provider)
                    .await?;
                if !self.tokens.store(token) {
                    warn!("Sign-in returned a token the scheduler already refused");
                }
            } else {
                debug!("Session token stored by a concurrent access");
            }
        }

        // Empty if sign-in returned a refused token or the poller cleared it
        if self.tokens.is_empty() {
            return Err(AccessError::AuthenticationIncomplete);
        }

        self.poller.refresh();
        Ok(())
    }

    /// Subscribes to the instance's log state
    pub fn logs(&self) -> watch::Receiver<LogState> {
        self.poller.subscribe()
    }

    pub fn token_cache(&self) -> &TokenCache {
        &self.tokens
    }

    pub fn is_signed_in(&self) -> bool {
        !self.tokens.is_empty()
    }

    /// Forgets the cached token; the next access signs in again
    pub fn sign_out(&self) {
        self.tokens.clear();
    }
}
