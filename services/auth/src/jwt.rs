//! JWT service for access token issuance and validation
//!
//! Tokens are HS512-signed JWTs carrying the user's identity as `sub` and an
//! `exp` instant. Nothing is persisted: a token stays valid until it expires,
//! and expiry is the only way to invalidate it.

use anyhow::Result;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use uuid::Uuid;

/// The only algorithm tokens may be signed with
const ALGORITHM: Algorithm = Algorithm::HS512;

/// Default access token lifetime in seconds (15 minutes)
const DEFAULT_ACCESS_TOKEN_EXPIRY: u64 = 900;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared secret used to sign and verify tokens
    pub secret: String,
    /// Access token expiration time in seconds
    pub access_token_expiry: u64,
}

impl JwtConfig {
    /// Create a new JwtConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Symmetric signing secret (required, non-empty)
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: Access token expiry in seconds (default: 900)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let access_token_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TOKEN_EXPIRY);

        Ok(JwtConfig {
            secret,
            access_token_expiry,
        })
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .finish()
    }
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    #[serde(default)]
    pub sub: String,
    /// Issued at time
    #[serde(default)]
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Reasons a token is refused
#[derive(Error, Debug)]
pub enum TokenError {
    /// Not a well-formed JWT
    #[error("malformed token")]
    Malformed,

    /// Signature does not match the shared secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// Header names an algorithm other than HS512
    #[error("unexpected signing algorithm")]
    AlgorithmMismatch,

    /// `exp` is in the past
    #[error("token expired")]
    Expired,

    /// `sub` is absent, empty or not a UUID
    #[error("token subject missing or invalid")]
    MissingSubject,

    /// Signing failed while issuing a token
    #[error("failed to sign token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),

    /// The system clock is before the Unix epoch
    #[error("system clock error")]
    Clock,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::AlgorithmMismatch
            }
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => TokenError::MissingSubject,
            _ => TokenError::Malformed,
        }
    }
}

/// JWT service
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: JwtConfig,
}

impl JwtService {
    /// Initialize a new JWT service
    pub fn new(config: JwtConfig) -> Result<Self> {
        if config.secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(JwtService {
            encoding_key,
            decoding_key,
            validation,
            config,
        })
    }

    /// Generate an access token for a user
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.generate_access_token_at(user_id, now()?)
    }

    fn generate_access_token_at(&self, user_id: Uuid, issued_at: u64) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(self.config.access_token_expiry),
        };

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }

    /// Validate a token and return the user ID it was issued for
    pub fn validate_token(&self, token: &str) -> Result<Uuid, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;

        let sub = token_data.claims.sub;
        if sub.is_empty() {
            return Err(TokenError::MissingSubject);
        }

        Uuid::parse_str(&sub).map_err(|_| TokenError::MissingSubject)
    }

    /// Get the access token expiry time
    pub fn access_token_expiry(&self) -> u64 {
        self.config.access_token_expiry
    }
}

fn now() -> Result<u64, TokenError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|_| TokenError::Clock)
}
