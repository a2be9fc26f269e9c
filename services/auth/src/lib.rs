//! Authentication building blocks for the marketplace backend
//!
//! Token issuance and validation, password hashing, credential validation
//! and the credential store.

pub mod jwt;
pub mod models;
pub mod password;
pub mod repositories;
pub mod validation;

pub use jwt::{JwtConfig, JwtService, TokenError};
pub use password::PasswordService;
