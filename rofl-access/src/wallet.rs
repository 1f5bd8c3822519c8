//! Wallet collaborators
//!
//! Machine access needs two things from a wallet: who is connected (address
//! and chain) and a way to sign the sign-in message. Both are traits so the
//! CLI, a browser bridge or a test double can supply them.

use async_trait::async_trait;
use thiserror::Error;

/// Errors reported by a wallet signer
#[derive(Debug, Error)]
pub enum SignerError {
    /// The user declined the signature request
    #[error("Signature request rejected: {0}")]
    Rejected(String),

    /// The signer could not produce a signature
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
}

/// Current wallet connection
pub trait WalletConnection: Send + Sync {
    /// Address of the connected account, if any
    fn address(&self) -> Option<String>;

    /// Chain the wallet is connected to
    fn chain_id(&self) -> u64;
}

/// Signs messages with the connected account
///
/// Signing may wait on a human approving the request in their wallet.
#[async_trait]
pub trait WalletSigner: Send + Sync {
    /// Signs `message` and returns a `0x`-prefixed hex signature
    async fn sign_message(&self, message: &str) -> Result<String, SignerError>;
}

/// Wallet connection with a fixed address and chain
#[derive(Debug, Clone)]
pub struct StaticWallet {
    address: Option<String>,
    chain_id: u64,
}

impl StaticWallet {
    pub fn new(address: Option<String>, chain_id: u64) -> Self {
        Self {
            address: address.filter(|a| !a.trim().is_empty()),
            chain_id,
        }
    }

    /// A wallet with no connected account
    pub fn disconnected(chain_id: u64) -> Self {
        Self::new(None, chain_id)
    }
}

impl WalletConnection for StaticWallet {
    fn address(&self) -> Option<String> {
        self.address.clone()
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }
}
