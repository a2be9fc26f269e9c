//! Repositories for credential records

pub mod user;

pub use user::{PgUserRepository, UserStore};
