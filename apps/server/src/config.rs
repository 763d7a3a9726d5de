//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use std::env;

use jamal_core::{MainStorePolicy, DEFAULT_STORE_ID};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Path to the SQLite database file
    pub database_path: String,

    /// Allowed CORS origin for the dashboard (default: `*`)
    pub cors_origin: String,

    /// Store id used when requests omit one
    pub default_store_id: String,

    /// Whether `is_main` must stay unique across stores
    pub main_store_policy: MainStorePolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "./jamal.db".to_string()),

            cors_origin: env::var("CORS_ORIGIN").unwrap_or_else(|_| "*".to_string()),

            default_store_id: env::var("DEFAULT_STORE_ID")
                .unwrap_or_else(|_| DEFAULT_STORE_ID.to_string()),

            main_store_policy: env::var("MAIN_STORE_POLICY")
                .unwrap_or_else(|_| "allow-multiple".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("MAIN_STORE_POLICY".to_string()))?,
        };

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_env() {
        // Only checks defaults; env vars are not set in the test runner
        let config = ServerConfig::load().unwrap();
        assert_eq!(config.default_store_id, "main");
        assert_eq!(config.main_store_policy, MainStorePolicy::AllowMultiple);
    }
}
