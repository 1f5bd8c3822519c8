//! Error types for machine access

use rofl_client::ClientError;
use thiserror::Error;

/// Result type alias for machine access operations
pub type Result<T> = std::result::Result<T, AccessError>;

/// Errors raised while acquiring credentials or fetching machine logs
///
/// Variants only carry owned strings and status codes so the error can be
/// cloned into observable poller state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// No wallet is connected
    #[error("No wallet address available; connect a wallet first")]
    MissingWalletAddress,

    /// Scheduler address was not provided
    #[error("Scheduler endpoint is not set")]
    MissingSchedulerEndpoint,

    /// Scheduler address is not a URL with a host
    #[error("Invalid scheduler endpoint: {0}")]
    InvalidSchedulerEndpoint(String),

    /// Wallet refused or failed to sign the login message
    #[error("Wallet signing failed: {0}")]
    SigningFailed(String),

    /// Login request did not reach the scheduler
    #[error("Login request failed: {0}")]
    LoginRequestFailed(String),

    /// Scheduler rejected the login
    #[error("Authentication rejected (status {status}): {body}")]
    AuthenticationRejected { status: u16, body: String },

    /// Login succeeded but the response carried no token
    #[error("Scheduler did not return a session token")]
    NoTokenReturned,

    /// Log retrieval failed; `status` is absent for transport and schema failures
    #[error("Log fetch failed{}: {body}", status_suffix(.status))]
    LogFetchFailed { status: Option<u16>, body: String },

    /// Log polling interval must be greater than zero
    #[error("Log poll interval must be greater than 0")]
    InvalidPollInterval,

    /// A token was acquired but is not in the cache
    #[error("Authentication did not complete")]
    AuthenticationIncomplete,
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

impl AccessError {
    /// Maps a login call failure onto the access taxonomy
    pub(crate) fn from_login(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } => Self::AuthenticationRejected {
                status,
                body: message,
            },
            ClientError::RequestFailed(e) => Self::LoginRequestFailed(e.to_string()),
            ClientError::ParseError(_) => Self::NoTokenReturned,
        }
    }

    /// Maps a log fetch failure onto the access taxonomy
    pub(crate) fn from_log_fetch(err: ClientError) -> Self {
        match err {
            ClientError::ApiError { status, message } => Self::LogFetchFailed {
                status: Some(status),
                body: message,
            },
            other => Self::LogFetchFailed {
                status: other.status(),
                body: other.to_string(),
            },
        }
    }

    /// Whether repeating the operation can succeed without user or code changes
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRejected { .. }
                | Self::LoginRequestFailed(_)
                | Self::SigningFailed(_)
                | Self::LogFetchFailed { .. }
        )
    }

    /// Whether the scheduler refused the session token
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Self::LogFetchFailed {
                status: Some(401 | 403),
                ..
            }
        )
    }
}
