//! Service configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults.

use serde::{Deserialize, Serialize};
use std::env;

/// Identity and purchase service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// JWT secret key for signing tokens
    pub jwt_secret: String,

    /// JWT access token lifetime in seconds
    pub jwt_access_ttl_secs: i64,

    /// JWT refresh token lifetime in seconds
    pub jwt_refresh_ttl_secs: i64,

    /// SQLite database path
    pub database_path: String,
}

impl ServiceConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServiceConfig {
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                // In production this MUST be set via environment variable
                "vendio-dev-secret-change-in-production".to_string()
            }),

            jwt_access_ttl_secs: env::var("JWT_ACCESS_TTL_SECS")
                .unwrap_or_else(|_| "900".to_string()) // 15 minutes
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_ACCESS_TTL_SECS".to_string()))?,

            jwt_refresh_ttl_secs: env::var("JWT_REFRESH_TTL_SECS")
                .unwrap_or_else(|_| "86400".to_string()) // 24 hours
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JWT_REFRESH_TTL_SECS".to_string()))?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "vendio.db".to_string()),
        };

        if config.jwt_access_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue("JWT_ACCESS_TTL_SECS".to_string()));
        }
        if config.jwt_refresh_ttl_secs <= config.jwt_access_ttl_secs {
            return Err(ConfigError::InvalidValue(
                "JWT_REFRESH_TTL_SECS".to_string(),
            ));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        // Not touching the process environment here; defaults only hold
        // when the variables are unset, which is the normal test state
        let config = ServiceConfig::load().unwrap();
        assert!(config.jwt_access_ttl_secs > 0);
        assert!(config.jwt_refresh_ttl_secs > config.jwt_access_ttl_secs);
        assert!(!config.jwt_secret.is_empty());
    }
}
