//! User model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Credential record: identity, public handle and password hash
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub guid: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// New user creation payload, password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub guid: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    /// Assign a fresh identity to a handle and hash
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            guid: Uuid::new_v4(),
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// User login credentials as submitted to `/register` and `/login`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginCredentials {
    /// 3-20 ASCII letters or digits
    #[schema(example = "alice123")]
    pub login: String,
    /// 8-32 characters with at least one letter and one digit
    #[schema(example = "Passw0rd!")]
    pub password: String,
}
