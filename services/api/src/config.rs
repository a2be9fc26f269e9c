//! HTTP server configuration

use anyhow::Result;
use serde::Deserialize;
use std::{net::SocketAddr, time::Duration};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Deadline for each store call, in seconds
    pub store_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from `SERVER_*` environment variables
    ///
    /// # Environment Variables
    /// - `SERVER_HOST`: Interface to bind (default: "0.0.0.0")
    /// - `SERVER_PORT`: Port to listen on (default: 8080)
    /// - `SERVER_STORE_TIMEOUT_SECS`: Store call deadline (default: 5)
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080)?
            .set_default("store_timeout_secs", 5)?
            .add_source(config::Environment::with_prefix("SERVER").try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Socket address to bind
    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}
