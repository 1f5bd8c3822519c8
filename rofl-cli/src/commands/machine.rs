//! Machine command handlers
//!
//! Handles access to rented machines, currently viewing and following
//! instance logs.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use rofl_access::{LogState, MachineAccess, TokenCache};
use rofl_core::domain::log::LogSnapshot;
use rofl_core::domain::token::SessionToken;
use tokio::sync::watch;

use super::credential_service;
use crate::config::Config;

/// Machine subcommands
#[derive(Subcommand)]
pub enum MachineCommands {
    /// Show instance logs
    Logs {
        /// Instance ID on the provider's machine
        instance: String,

        /// Provider the machine is rented from
        #[arg(long, env = "ROFL_PROVIDER")]
        provider: String,

        /// Existing session token; skips signing in
        #[arg(long, env = "ROFL_SESSION_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Keep printing new log lines until interrupted
        #[arg(short, long)]
        follow: bool,
    },
}

/// Handle machine commands
pub async fn handle_machine_command(command: MachineCommands, config: &Config) -> Result<()> {
    match command {
        MachineCommands::Logs {
            instance,
            provider,
            token,
            follow,
        } => show_logs(config, &instance, &provider, token, follow).await,
    }
}

/// Fetch and display instance logs
async fn show_logs(
    config: &Config,
    instance: &str,
    provider: &str,
    token: Option<String>,
    follow: bool,
) -> Result<()> {
    let access_config = config.access_config(provider)?;

    let tokens = match token.and_then(SessionToken::new) {
        Some(token) => TokenCache::with_token(token),
        None => TokenCache::new(),
    };

    let access = MachineAccess::from_config(
        &access_config,
        instance,
        credential_service(config),
        tokens,
    )?;

    access.access().await.context("Failed to access machine")?;

    let mut rx = access.logs();
    let state = next_completed(&mut rx).await?;

    if let Some(error) = &state.error {
        anyhow::bail!("Failed to fetch logs for instance {}: {}", instance, error);
    }

    if state.logs().is_empty() && !follow {
        println!("{}", "No logs found for this instance.".yellow());
        return Ok(());
    }

    print_lines(state.logs());

    if follow {
        follow_logs(&access, rx, state.snapshot).await?;
    }

    Ok(())
}

/// Prints new lines from each completed poll until Ctrl-C
async fn follow_logs(
    access: &MachineAccess,
    mut rx: watch::Receiver<LogState>,
    mut shown: LogSnapshot,
) -> Result<()> {
    loop {
        let state = tokio::select! {
            state = next_completed(&mut rx) => state?,
            _ = tokio::signal::ctrl_c() => return Ok(()),
        };

        match &state.error {
            Some(error) => {
                eprintln!("{} {}", "⚠".yellow(), error.to_string().yellow());
                // A refused token was dropped by the poller; sign in again
                if !access.is_signed_in() {
                    access
                        .access()
                        .await
                        .context("Failed to sign in to scheduler again")?;
                }
            }
            None => {
                print_lines(state.snapshot.unseen_since(&shown));
                shown = state.snapshot;
            }
        }
    }
}

/// Waits for the next poll that has finished
async fn next_completed(rx: &mut watch::Receiver<LogState>) -> Result<LogState> {
    loop {
        rx.changed().await.context("Log poller stopped")?;
        let state = rx.borrow_and_update().clone();
        if state.fetches > 0 && state.is_idle() {
            return Ok(state);
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}
