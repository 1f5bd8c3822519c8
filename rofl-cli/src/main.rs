//! ROFL CLI
//!
//! Command-line interface for signing in to a ROFL scheduler and reading the
//! logs of rented machine instances.

mod commands;
mod config;
mod signer;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rofl")]
#[command(about = "ROFL machine access CLI", long_about = None)]
struct Cli {
    /// Scheduler URL of the provider machine
    #[arg(long, env = "ROFL_SCHEDULER_URL")]
    scheduler_url: String,

    /// Wallet address to sign in with
    #[arg(long, env = "ROFL_WALLET_ADDRESS")]
    address: Option<String>,

    /// Chain ID the wallet signs for (default: Sapphire mainnet)
    #[arg(long, env = "ROFL_CHAIN_ID", default_value_t = 23294)]
    chain_id: u64,

    /// Seconds between log refreshes when following
    #[arg(long, env = "ROFL_LOG_POLL_INTERVAL", default_value_t = 10)]
    poll_interval: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rofl_cli=warn,rofl_access=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        scheduler_url: cli.scheduler_url,
        address: cli.address,
        chain_id: cli.chain_id,
        poll_interval: Duration::from_secs(cli.poll_interval),
    };

    handle_command(cli.command, &config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_logs_command() {
        let cli = Cli::try_parse_from([
            "rofl",
            "--scheduler-url",
            "https://scheduler.example.com",
            "--address",
            "0xabc",
            "machine",
            "logs",
            "instance-1",
            "--provider",
            "oasis1provider",
            "--follow",
        ])
        .unwrap();

        assert_eq!(cli.scheduler_url, "https://scheduler.example.com");
        assert_eq!(cli.chain_id, 23294);
        match cli.command {
            Commands::Machine {
                command:
                    commands::MachineCommands::Logs {
                        instance, follow, ..
                    },
            } => {
                assert_eq!(instance, "instance-1");
                assert!(follow);
            }
            _ => panic!("expected machine logs command"),
        }
    }
}
