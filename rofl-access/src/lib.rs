//! ROFL Machine Access
//!
//! Authenticated log retrieval for machines rented from a ROFL provider.
//!
//! Architecture:
//! - Wallet: Traits for the connected account and its message signer
//! - Services: Credential acquisition (SIWE sign-in for a session token)
//! - Scheduler: Log polling against the machine's scheduler
//! - Access: Orchestration that signs in once and then refreshes logs
//!
//! # Example
//!
//! ```no_run
//! use rofl_access::{AccessConfig, MachineAccess, SiweCredentialService, StaticWallet, TokenCache};
//! # use rofl_access::wallet::WalletSigner;
//! use std::sync::Arc;
//!
//! # async fn example(signer: Arc<dyn WalletSigner>) -> anyhow::Result<()> {
//! let config = AccessConfig::new(
//!     "https://scheduler.example.com".to_string(),
//!     "oasis1provider".to_string(),
//! );
//! let wallet = Arc::new(StaticWallet::new(Some("0x1234...".to_string()), 23294));
//! let credentials = Arc::new(SiweCredentialService::new(wallet, signer));
//!
//! let access = MachineAccess::from_config(&config, "instance-1", credentials, TokenCache::new())?;
//! access.access().await?;
//!
//! let mut logs = access.logs();
//! logs.changed().await?;
//! for line in logs.borrow().logs() {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod service;
pub mod token_cache;
pub mod wallet;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use access::MachineAccess;
pub use config::AccessConfig;
pub use error::{AccessError, Result};
pub use scheduler::{LogPoller, LogState, LogTarget};
pub use service::{CredentialService, SiweCredentialService};
pub use token_cache::TokenCache;
pub use wallet::{SignerError, StaticWallet, WalletConnection, WalletSigner};
