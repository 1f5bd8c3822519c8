//! In-memory session token cache
//!
//! Holds the token acquired by machine access and shares it with the log
//! poller. Nothing is persisted; a new process starts signed out.
//!
//! A token the scheduler refused is remembered, and storing it again is a
//! no-op, so a credential source that keeps handing out the same stale token
//! cannot put it back in circulation.

use rofl_core::domain::token::SessionToken;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// Cloneable handle to the cached session token
#[derive(Debug, Clone)]
pub struct TokenCache {
    tx: Arc<watch::Sender<Option<SessionToken>>>,
    refused: Arc<Mutex<Option<SessionToken>>>,
}

impl TokenCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            tx: Arc::new(watch::Sender::new(None)),
            refused: Arc::new(Mutex::new(None)),
        }
    }

    /// Creates a cache already holding `token`
    pub fn with_token(token: SessionToken) -> Self {
        let cache = Self::new();
        cache.store(token);
        cache
    }

    /// Returns the cached token, if any
    pub fn current(&self) -> Option<SessionToken> {
        self.tx.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_none()
    }

    /// Replaces the cached token
    ///
    /// Returns `false` and leaves the cache untouched if `token` was
    /// previously refused via [`Self::clear_if`].
    pub fn store(&self, token: SessionToken) -> bool {
        if self.refused().as_ref() == Some(&token) {
            return false;
        }
        self.tx.send_replace(Some(token));
        true
    }

    /// Drops the cached token
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// Drops the cached token only if it is still `token`
    ///
    /// Returns whether the cache was cleared. A token stored after `token`
    /// failed is left alone. Either way `token` is remembered as refused.
    pub fn clear_if(&self, token: &SessionToken) -> bool {
        *self.refused() = Some(token.clone());
        self.tx.send_if_modified(|current| {
            if current.as_ref() == Some(token) {
                *current = None;
                true
            } else {
                false
            }
        })
    }

    fn refused(&self) -> std::sync::MutexGuard<'_, Option<SessionToken>> {
        self.refused.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Subscribes to token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionToken>> {
        self.tx.subscribe()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new()
    }
}
