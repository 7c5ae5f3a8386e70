//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREROOM_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREROOM_PORT` - Listen port (default: 8080)
//! - `STOREROOM_ACTIVITY_LIMIT` - Default activity feed size (default: 10)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Default number of activity messages shown in the feed
    pub activity_limit: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREROOM_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREROOM_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("STOREROOM_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREROOM_PORT".to_owned(), e.to_string()))?;
        let activity_limit = get_env_or_default("STOREROOM_ACTIVITY_LIMIT", "10")
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREROOM_ACTIVITY_LIMIT".to_owned(), e.to_string())
            })?;

        Ok(Self {
            host,
            port,
            activity_limit,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8080,
            activity_limit: 10,
        }
    }
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}
