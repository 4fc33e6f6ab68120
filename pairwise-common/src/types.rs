//! API request/response types
//!
//! Field names follow the original PairWise wire contract: request bodies
//! use camelCase (`oneTimePassword`, `accessCode`), authentication
//! responses use snake_case (`next_step`, `session_expiry`).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// POST /pairwise/login request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub one_time_password: String,
}

/// POST /pairwise/login success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    pub message: String,
    pub next_step: String,
    pub access_code_expiry: String,
}

/// POST /pairwise/verify-access-code request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeRequest {
    pub access_code: String,
}

/// POST /pairwise/verify-access-code success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessCodeResponse {
    pub status: String,
    pub message: String,
    pub next_step: String,
    pub session_expiry: String,
    /// Bearer token for subsequent privileged calls
    pub token: String,
}

/// GET /pairwise/auth-check success response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCheckResponse {
    pub authenticated: bool,
    pub user: UserInfo,
}

/// Authenticated subject as presented to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub username: String,
    pub role: String,
}

/// Generic `{message}` response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// POST /pairwise/match and /pairwise/download request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeginRequest {
    pub id: Uuid,
}
