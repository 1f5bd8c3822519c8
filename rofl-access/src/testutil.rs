//! Shared test doubles for wallet collaborators.

use async_trait::async_trait;
use rofl_core::domain::token::SessionToken;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::{self, AccessError};
use crate::service::CredentialService;
use crate::wallet::{SignerError, StaticWallet, WalletSigner};

pub const TEST_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

pub fn connected_wallet() -> StaticWallet {
    StaticWallet::new(Some(TEST_ADDRESS.to_string()), 23294)
}

/// Signer that answers every request with the same signature
pub struct FixedSigner {
    signature: Option<String>,
    delay: Duration,
    calls: AtomicUsize,
    messages: Mutex<Vec<String>>,
}

impl FixedSigner {
    pub fn new(signature: &str) -> Self {
        Self {
            signature: Some(signature.to_string()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// Signer whose user declines every request
    pub fn rejecting() -> Self {
        Self {
            signature: None,
            ..Self::new("")
        }
    }

    /// Holds each request open for `delay`, like a user reading the prompt
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletSigner for FixedSigner {
    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.messages.lock().unwrap().push(message.to_string());

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.signature
            .clone()
            .ok_or_else(|| SignerError::Rejected("user denied message signature".to_string()))
    }
}

/// Credential service replaying a fixed list of outcomes
pub struct ScriptedCredentials {
    outcomes: Mutex<VecDeque<error::Result<SessionToken>>>,
    fallback: Option<SessionToken>,
    calls: AtomicUsize,
}

impl ScriptedCredentials {
    /// Returns `outcomes` in order, then fails with `AuthenticationIncomplete`
    pub fn new(outcomes: Vec<error::Result<SessionToken>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            fallback: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Returns `token` on every call
    pub fn succeeding(token: SessionToken) -> Self {
        Self {
            fallback: Some(token),
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialService for ScriptedCredentials {
    async fn acquire(&self, _scheduler_url: Option<&str>, _provider: &str) -> error::Result<SessionToken> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(outcome) = self.outcomes.lock().unwrap().pop_front() {
            return outcome;
        }
        self.fallback
            .clone()
            .ok_or(AccessError::AuthenticationIncomplete)
    }
}
