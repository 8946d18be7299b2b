//! Application configuration management.
//!
//! Configuration is read once at startup from environment variables (and an optional `.env` file) using `envy`, then handed to the components that need it.
//! Nothing in here is mutated after `from_env` returns.

use serde::Deserialize;

use crate::auth::token::MAX_EXPIRE_HOURS;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): HMAC secret used to sign session tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 8080
/// - `JWT_EXPIRE_HOURS` (optional): session token lifetime, defaults to 24, at most 8760
/// - `RATE_LIMIT_PER_SECOND` (optional): requests per second per client IP, defaults to 20
/// - `DB_MAX_CONNECTIONS` (optional): pool size, defaults to 5
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    pub jwt_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_expire_hours")]
    pub jwt_expire_hours: i64,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_second: u32,
}

fn default_port() -> u16 {
    8080
}

fn default_expire_hours() -> i64 {
    24
}

fn default_max_connections() -> u32 {
    5
}

fn default_rate_limit() -> u32 {
    20
}

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Env(#[from] envy::Error),

    #[error("JWT_SECRET must not be empty")]
    EmptySecret,

    #[error("RATE_LIMIT_PER_SECOND must be positive")]
    InvalidRateLimit,

    #[error("JWT_EXPIRE_HOURS must be between 1 and 8760, got {0}")]
    InvalidExpiry(i64),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (`DATABASE_URL`, `JWT_SECRET`)
    /// - Environment variable values cannot be parsed into expected types
    /// - The secret is empty or the token lifetime is outside 1..=8760 hours
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = envy::from_env::<Config>()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if !(1..=MAX_EXPIRE_HOURS).contains(&self.jwt_expire_hours) {
            return Err(ConfigError::InvalidExpiry(self.jwt_expire_hours));
        }
        if self.rate_limit_per_second == 0 {
            return Err(ConfigError::InvalidRateLimit);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        let config = envy::from_iter::<_, Config>(vars)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn applies_defaults() {
        let config = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("JWT_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 8080);
        assert_eq!(config.jwt_expire_hours, 24);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.rate_limit_per_second, 20);
    }

    #[test]
    fn rejects_missing_secret() {
        let err = from_pairs(&[("DATABASE_URL", "postgres://localhost/coffee")]).unwrap_err();
        assert!(matches!(err, ConfigError::Env(_)));
    }

    #[test]
    fn rejects_blank_secret_and_bad_expiry() {
        let err = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("JWT_SECRET", "   "),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::EmptySecret));

        let err = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_EXPIRE_HOURS", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExpiry(0)));
    }

    #[test]
    fn caps_token_lifetime() {
        let base = [
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("JWT_SECRET", "s3cret"),
        ];

        let err = from_pairs(&[base[0], base[1], ("JWT_EXPIRE_HOURS", "10000000000")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExpiry(10_000_000_000)));

        let err = from_pairs(&[base[0], base[1], ("JWT_EXPIRE_HOURS", "8761")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidExpiry(8761)));

        let config = from_pairs(&[base[0], base[1], ("JWT_EXPIRE_HOURS", "8760")]).unwrap();
        assert_eq!(config.jwt_expire_hours, MAX_EXPIRE_HOURS);
    }

    #[test]
    fn rejects_zero_rate_limit() {
        let err = from_pairs(&[
            ("DATABASE_URL", "postgres://localhost/coffee"),
            ("JWT_SECRET", "s3cret"),
            ("RATE_LIMIT_PER_SECOND", "0"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRateLimit));
    }
}
