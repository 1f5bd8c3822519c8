//! Authentication endpoints

use crate::SchedulerClient;
use crate::error::Result;
use rofl_core::dto::auth::{LoginRequest, LoginResponse};
use tracing::debug;

/// Path of the login endpoint, relative to the scheduler base URL
pub const LOGIN_PATH: &str = "/rofl-scheduler/v1/auth/login";

impl SchedulerClient {
    // =============================================================================
    // Authentication
    // =============================================================================

    /// Exchange a signed SIWE message for a session token
    ///
    /// # Arguments
    /// * `message` - The rendered SIWE message that was signed
    /// * `signature` - The hex signature, sent as given
    ///
    /// # Returns
    /// The login response; the token inside may be absent and must be checked
    /// by the caller
    pub async fn login_siwe(&self, message: &str, signature: &str) -> Result<LoginResponse> {
        debug!(path = LOGIN_PATH, "Sending SIWE login request");

        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(&LoginRequest::siwe(message, signature))
            .send()
            .await?;

        self.handle_response(response).await
    }
}
