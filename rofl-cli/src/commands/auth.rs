//! Auth command handlers

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use rofl_access::CredentialService;

use super::credential_service;
use crate::config::Config;

/// Auth subcommands
#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in to the scheduler and print the session token
    Login {
        /// Provider the machine is rented from
        #[arg(long, env = "ROFL_PROVIDER")]
        provider: String,
    },
}

/// Handle auth commands
pub async fn handle_auth_command(command: AuthCommands, config: &Config) -> Result<()> {
    match command {
        AuthCommands::Login { provider } => login(config, &provider).await,
    }
}

async fn login(config: &Config, provider: &str) -> Result<()> {
    let access_config = config.access_config(provider)?;

    let token = credential_service(config)
        .acquire(Some(access_config.scheduler_url.as_str()), provider)
        .await
        .context("Failed to sign in to scheduler")?;

    eprintln!("{}", "✓ Signed in".green());
    println!("{}", token.as_str());

    Ok(())
}
