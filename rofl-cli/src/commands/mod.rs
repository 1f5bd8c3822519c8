//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod auth;
mod machine;

pub use auth::AuthCommands;
pub use machine::MachineCommands;

use anyhow::Result;
use clap::Subcommand;
use rofl_access::{SiweCredentialService, StaticWallet};
use std::sync::Arc;

use crate::config::Config;
use crate::signer::PromptSigner;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Scheduler authentication
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Rented machine access
    Machine {
        #[command(subcommand)]
        command: MachineCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Auth { command } => auth::handle_auth_command(command, config).await,
        Commands::Machine { command } => machine::handle_machine_command(command, config).await,
    }
}

/// Credential service signing with the configured wallet through the terminal
fn credential_service(config: &Config) -> Arc<SiweCredentialService> {
    let wallet = StaticWallet::new(config.address.clone(), config.chain_id);
    Arc::new(SiweCredentialService::new(
        Arc::new(wallet),
        Arc::new(PromptSigner),
    ))
}
