//! API models for request and response payloads

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

pub mod ad;

/// Response for user registration
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub guid: Uuid,
    pub username: String,
}

/// Response for user login
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}
