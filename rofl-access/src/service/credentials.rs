//! Credential acquisition
//!
//! Exchanges a wallet signature over a SIWE message for a scheduler session
//! token. A single attempt either yields a token or fails; nothing is retried
//! here.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, Url};
use rofl_client::SchedulerClient;
use rofl_core::domain::siwe::SiweMessage;
use rofl_core::domain::token::SessionToken;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{AccessError, Result};
use crate::wallet::{WalletConnection, WalletSigner};

/// Service that obtains a session token from a scheduler
#[async_trait]
pub trait CredentialService: Send + Sync {
    /// Acquires a fresh session token
    ///
    /// # Arguments
    /// * `scheduler_url` - Base address of the scheduler; `None` or empty is an error
    /// * `provider` - Provider identifier, used only in the sign-in statement
    async fn acquire(&self, scheduler_url: Option<&str>, provider: &str) -> Result<SessionToken>;
}

/// Credential service backed by Sign-In with Ethereum
pub struct SiweCredentialService {
    wallet: Arc<dyn WalletConnection>,
    signer: Arc<dyn WalletSigner>,
    http: Client,
}

impl SiweCredentialService {
    /// Creates a credential service using the given wallet
    pub fn new(wallet: Arc<dyn WalletConnection>, signer: Arc<dyn WalletSigner>) -> Self {
        Self::with_client(wallet, signer, Client::new())
    }

    /// Creates a credential service with a preconfigured HTTP client
    pub fn with_client(
        wallet: Arc<dyn WalletConnection>,
        signer: Arc<dyn WalletSigner>,
        http: Client,
    ) -> Self {
        Self {
            wallet,
            signer,
            http,
        }
    }
}

/// Hostname of the scheduler, shown to the user as the sign-in domain
fn scheduler_domain(scheduler_url: &str) -> Result<String> {
    Url::parse(scheduler_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .ok_or_else(|| AccessError::InvalidSchedulerEndpoint(scheduler_url.to_string()))
}

fn sign_in_statement(provider: &str, domain: &str) -> String {
    format!("Sign in to {domain} to access machines of provider {provider}")
}

#[async_trait]
impl CredentialService for SiweCredentialService {
    async fn acquire(&self, scheduler_url: Option<&str>, provider: &str) -> Result<SessionToken> {
        let address = self
            .wallet
            .address()
            .ok_or(AccessError::MissingWalletAddress)?;

        let scheduler_url = scheduler_url
            .filter(|url| !url.trim().is_empty())
            .ok_or(AccessError::MissingSchedulerEndpoint)?;

        let domain = scheduler_domain(scheduler_url)?;

        let message = SiweMessage::new(
            domain.clone(),
            address,
            sign_in_statement(provider, &domain),
            scheduler_url,
            self.wallet.chain_id(),
            Utc::now(),
        )
        .to_string();

        debug!(%domain, "Requesting wallet signature");
        let signature = self
            .signer
            .sign_message(&message)
            .await
            .map_err(|e| AccessError::SigningFailed(e.to_string()))?;
        let signature = signature.strip_prefix("0x").unwrap_or(&signature);

        let client = SchedulerClient::with_client(scheduler_url, self.http.clone());
        let response = client
            .login_siwe(&message, signature)
            .await
            .map_err(|e| {
                let err = AccessError::from_login(e);
                warn!(%domain, "Scheduler login failed: {}", err);
                err
            })?;

        let token = response.into_token().ok_or(AccessError::NoTokenReturned)?;
        info!(%domain, "Acquired scheduler session token");

        Ok(token)
    }
}
