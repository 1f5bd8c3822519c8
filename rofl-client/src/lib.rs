//! ROFL Scheduler HTTP Client
//!
//! A small, type-safe client for the ROFL scheduler API running on a provider
//! machine. It covers the endpoints the machine access flow needs: SIWE login
//! and instance log retrieval.
//!
//! # Example
//!
//! ```no_run
//! use rofl_client::SchedulerClient;
//! use rofl_core::domain::token::SessionToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SchedulerClient::new("https://scheduler.example.com");
//! let token = SessionToken::new("auth-token-123").unwrap();
//!
//! let logs = client.get_logs(&token, "instance-1").await?;
//! for line in logs.logs {
//!     println!("{}", line);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;
mod auth;
mod logs;

// Re-export commonly used types
pub use auth::LOGIN_PATH;
pub use error::{ClientError, Result};
pub use logs::LOGS_PATH;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the ROFL scheduler API
#[derive(Debug, Clone)]
pub struct SchedulerClient {
    /// Base URL of the scheduler (e.g., "https://scheduler.example.com")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl SchedulerClient {
    /// Create a new scheduler client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the scheduler (e.g., "https://scheduler.example.com")
    ///
    /// # Example
    /// ```
    /// use rofl_client::SchedulerClient;
    ///
    /// let client = SchedulerClient::new("https://scheduler.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new scheduler client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use rofl_client::SchedulerClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = SchedulerClient::with_client("https://scheduler.example.com", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the scheduler
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// Non-success statuses become `ApiError` with the body text attached.
    /// A success body that does not match `T` becomes `ParseError`.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}
