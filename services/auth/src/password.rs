//! Argon2id password hashing

use argon2::{
    Algorithm, Argon2, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use std::sync::{Arc, OnceLock};
use thiserror::Error;

pub use argon2::Params;

/// Failure to produce a password hash
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("password hashing task failed")]
    Task,
}

/// Plaintext behind the decoy hash; never a valid account password
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Hashes and verifies passwords.
///
/// Hashing is CPU bound, so the async entry points move the work onto the
/// blocking thread pool.
#[derive(Clone, Default)]
pub struct PasswordService {
    params: Params,
    decoy_hash: Arc<OnceLock<String>>,
}

impl PasswordService {
    /// Use explicit Argon2 cost parameters
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            decoy_hash: Arc::default(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut rand::thread_rng());
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A stored hash that cannot be parsed never matches.
    pub fn verify(&self, password_hash: &str, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
            return false;
        };

        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Spend the cost of one verification without a stored hash.
    ///
    /// Used when the account does not exist, so an unknown handle takes as
    /// long to reject as a wrong password. Always returns `false`.
    pub fn verify_decoy(&self, password: &str) -> bool {
        let decoy = self
            .decoy_hash
            .get_or_init(|| self.hash(DECOY_PASSWORD).unwrap_or_default());
        let _ = self.verify(decoy, password);
        false
    }

    pub async fn hash_async(&self, password: String) -> Result<String, PasswordError> {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.hash(&password))
            .await
            .map_err(|_| PasswordError::Task)?
    }

    pub async fn verify_async(&self, password_hash: String, password: String) -> bool {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify(&password_hash, &password))
            .await
            .unwrap_or(false)
    }

    pub async fn verify_decoy_async(&self, password: String) -> bool {
        let service = self.clone();
        tokio::task::spawn_blocking(move || service.verify_decoy(&password))
            .await
            .unwrap_or(false)
    }
}
