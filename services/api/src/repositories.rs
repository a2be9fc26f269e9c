//! Repositories for database operations

pub mod ad;

pub use ad::{AdStore, PgAdRepository};
