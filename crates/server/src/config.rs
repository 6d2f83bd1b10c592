//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `FRESHBASKET_DATABASE_URL` - `PostgreSQL` connection string; falls
//!   back to the generic `DATABASE_URL`. When neither is set the server
//!   runs against the in-memory store (local development mode).
//! - `FRESHBASKET_HOST` - Bind address (default: 127.0.0.1)
//! - `FRESHBASKET_PORT` - Listen port (default: 5000)
//! - `FRESHBASKET_CART_POLICY` - `merge` (default) or `append`; controls
//!   what a repeated add-to-cart for the same product does
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

use crate::services::cart::CartPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// `PostgreSQL` connection URL (contains password). `None` selects
    /// the in-memory store.
    pub database_url: Option<SecretString>,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// What a repeated add-to-cart for the same product does
    pub cart_policy: CartPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("FRESHBASKET_DATABASE_URL");
        let host = get_env_or_default("FRESHBASKET_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FRESHBASKET_HOST".to_owned(), e.to_string())
            })?;
        let port = get_env_or_default("FRESHBASKET_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FRESHBASKET_PORT".to_owned(), e.to_string())
            })?;
        let cart_policy = parse_cart_policy(&get_env_or_default(
            "FRESHBASKET_CART_POLICY",
            "merge",
        ))?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            cart_policy,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Option<SecretString> {
    std::env::var(primary_key)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .map(SecretString::from)
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_cart_policy(value: &str) -> Result<CartPolicy, ConfigError> {
    match value {
        "merge" => Ok(CartPolicy::Merge),
        "append" => Ok(CartPolicy::Append),
        other => Err(ConfigError::InvalidEnvVar(
            "FRESHBASKET_CART_POLICY".to_owned(),
            format!("expected 'merge' or 'append', got '{other}'"),
        )),
    }
}
