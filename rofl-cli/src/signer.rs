//! Terminal signer
//!
//! Shows the sign-in message and waits for the user to paste the signature
//! their wallet produced for it.

use async_trait::async_trait;
use colored::*;
use rofl_access::{SignerError, WalletSigner};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Signer that asks the user to sign in an external wallet
pub struct PromptSigner;

#[async_trait]
impl WalletSigner for PromptSigner {
    async fn sign_message(&self, message: &str) -> Result<String, SignerError> {
        eprintln!("{}", "Sign this message with your wallet:".bold());
        eprintln!("{}", "─".repeat(80).dimmed());
        eprintln!("{}", message);
        eprintln!("{}", "─".repeat(80).dimmed());
        eprint!("Signature (0x…): ");

        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .map_err(|e| SignerError::Unavailable(e.to_string()))?;

        parse_signature(&line)
    }
}

/// Validates a pasted signature
fn parse_signature(input: &str) -> Result<String, SignerError> {
    let signature = input.trim();

    if signature.is_empty() {
        return Err(SignerError::Rejected("no signature entered".to_string()));
    }

    let valid = signature
        .strip_prefix("0x")
        .is_some_and(|hex| !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if !valid {
        return Err(SignerError::Rejected(
            "expected a 0x-prefixed hex signature".to_string(),
        ));
    }

    Ok(signature.to_string())
}
