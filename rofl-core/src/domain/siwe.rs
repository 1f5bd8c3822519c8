//! Sign-In with Ethereum (EIP-4361) messages
//!
//! The scheduler authenticates wallet owners by verifying a signature over a
//! SIWE message. The message is built here and rendered to its canonical text
//! form, which is what the wallet signs and what the scheduler re-parses.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// SIWE protocol version understood by the scheduler
pub const SIWE_VERSION: &str = "1";

/// How long a sign-in message stays valid after issuance
pub const MESSAGE_VALIDITY_HOURS: i64 = 1;

/// A structured SIWE message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiweMessage {
    /// Host requesting the sign-in (the scheduler hostname)
    pub domain: String,
    /// Signer address
    pub address: String,
    /// Human readable statement shown in the wallet
    pub statement: String,
    /// Resource the sign-in is for (the scheduler base address)
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub issued_at: DateTime<Utc>,
    /// Forwarded to the scheduler; not checked locally
    pub expiration_time: DateTime<Utc>,
    pub nonce: String,
}

impl SiweMessage {
    /// Creates a message issued at `issued_at`, expiring one hour later, with a fresh nonce
    pub fn new(
        domain: impl Into<String>,
        address: impl Into<String>,
        statement: impl Into<String>,
        uri: impl Into<String>,
        chain_id: u64,
        issued_at: DateTime<Utc>,
    ) -> Self {
        Self {
            domain: domain.into(),
            address: address.into(),
            statement: statement.into(),
            uri: uri.into(),
            version: SIWE_VERSION.to_string(),
            chain_id,
            issued_at,
            expiration_time: issued_at + Duration::hours(MESSAGE_VALIDITY_HOURS),
            nonce: generate_nonce(),
        }
    }
}

/// Random alphanumeric nonce, only used to make each message unique
pub fn generate_nonce() -> String {
    Uuid::new_v4().simple().to_string()
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl fmt::Display for SiweMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} wants you to sign in with your Ethereum account:",
            self.domain
        )?;
        writeln!(f, "{}", self.address)?;
        writeln!(f)?;
        writeln!(f, "{}", self.statement)?;
        writeln!(f)?;
        writeln!(f, "URI: {}", self.uri)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        writeln!(f, "Issued At: {}", format_timestamp(&self.issued_at))?;
        write!(
            f,
            "Expiration Time: {}",
            format_timestamp(&self.expiration_time)
        )
    }
}
