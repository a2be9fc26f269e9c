//! Marketplace HTTP API
//!
//! Account registration and login, plus creating, listing and fetching
//! classified ads. Listing requests are normalized into a [`listing::ListingQuery`]
//! and executed as a parameterized query; each returned ad is annotated with
//! whether the caller owns it.

pub mod config;
pub mod doc;
pub mod error;
pub mod listing;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod repositories;
pub mod routes;
pub mod state;

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global tracing subscriber, honouring `RUST_LOG`
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("setting default subscriber failed: {}", e))
}
