//! Authentication DTOs

use serde::{Deserialize, Serialize};

use crate::domain::token::SessionToken;

/// Authentication methods accepted by the scheduler login endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMethod {
    Siwe,
}

/// Signed SIWE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiweLoginData {
    /// Rendered SIWE message text
    pub message: String,
    /// Hex signature over `message`, without the `0x` prefix
    pub signature: String,
}

/// Request body for `POST /rofl-scheduler/v1/auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub method: AuthMethod,
    pub data: SiweLoginData,
}

impl LoginRequest {
    pub fn siwe(message: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            method: AuthMethod::Siwe,
            data: SiweLoginData {
                message: message.into(),
                signature: signature.into(),
            },
        }
    }
}

/// Response body of a successful login
///
/// `token` is optional in the schema so a success response without one can be
/// told apart from a body that is not JSON at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    /// Extracts the session token, if the scheduler returned a non-empty one
    pub fn into_token(self) -> Option<SessionToken> {
        self.token.and_then(SessionToken::new)
    }
}
