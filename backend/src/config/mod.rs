//! Central module for application-wide configuration settings.
//!
//! This module handles loading and managing configuration parameters such as
//! the database URL, server address, session signing secret and password
//! hashing cost. Values come from the environment, with the JWT secret also
//! readable from a mounted secret file.

use std::{env, fmt::Display, fs::read_to_string, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};

const SECRETS_DIR: &str = "/run/secrets";

/// Longest accepted session lifetime: one year.
pub const MAX_SESSION_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid {key} value '{value}': {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },

    #[error("{0} is not set and no secret file was found")]
    MissingSecret(String),
}

/// Credentials for the first super-user, created at startup when absent.
#[derive(Debug, Clone)]
pub struct BootstrapAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub session_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub cors_origin: Option<String>,
    pub bootstrap: Option<BootstrapAccount>,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => secret,
            _ => read_secret("JWT_SECRET")?,
        };

        let bcrypt_cost: u32 = try_load(&lookup, "BCRYPT_COST", "10")?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST".to_string(),
                value: bcrypt_cost.to_string(),
                reason: "must be between 4 and 31".to_string(),
            });
        }

        let session_ttl_secs: i64 = try_load(&lookup, "SESSION_TTL_SECS", "3600")?;
        if !(1..=MAX_SESSION_TTL_SECS).contains(&session_ttl_secs) {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_SECS".to_string(),
                value: session_ttl_secs.to_string(),
                reason: format!("must be between 1 and {MAX_SESSION_TTL_SECS}"),
            });
        }

        let bootstrap = match (
            lookup("CAMPUS_BOOTSTRAP_EMAIL"),
            lookup("CAMPUS_BOOTSTRAP_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(BootstrapAccount {
                name: lookup("CAMPUS_BOOTSTRAP_NAME").unwrap_or_else(|| "Super Admin".to_string()),
                email,
                password,
            }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("Bootstrap account needs both CAMPUS_BOOTSTRAP_EMAIL and CAMPUS_BOOTSTRAP_PASSWORD, skipping");
                None
            }
            (None, None) => None,
        };

        Ok(Self {
            host: try_load(&lookup, "CAMPUS_HOST", "127.0.0.1")?,
            port: try_load(&lookup, "CAMPUS_PORT", "3000")?,
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://campus.db?mode=rwc")?,
            database_max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?,
            jwt_secret,
            session_ttl_secs,
            bcrypt_cost,
            cors_origin: lookup("CORS_ORIGIN").filter(|origin| !origin.trim().is_empty()),
            bootstrap,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.to_string(),
        value: value.clone(),
        reason: e.to_string(),
    })
}

fn read_secret(secret_name: &str) -> Result<String, ConfigError> {
    let path = format!("{SECRETS_DIR}/{secret_name}");

    read_to_string(&path)
        .map(|s| s.trim().to_string())
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            warn!("Failed to read {secret_name} from {path}");
            ConfigError::MissingSecret(secret_name.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.cors_origin.is_none());
        assert!(config.bootstrap.is_none());
        assert_eq!(config.address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CAMPUS_PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "CAMPUS_PORT"));
    }

    #[test]
    fn test_bcrypt_cost_out_of_range() {
        let err = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("BCRYPT_COST", "2"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("BCRYPT_COST"));
    }

    #[test]
    fn test_session_ttl_is_bounded() {
        for ttl in ["0", "10000000000000"] {
            let err = Config::from_lookup(lookup_from(&[
                ("JWT_SECRET", "s3cret"),
                ("SESSION_TTL_SECS", ttl),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "SESSION_TTL_SECS"));
        }

        let max = MAX_SESSION_TTL_SECS.to_string();
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("SESSION_TTL_SECS", max.as_str()),
        ]))
        .unwrap();
        assert_eq!(config.session_ttl_secs, MAX_SESSION_TTL_SECS);
    }

    #[test]
    fn test_bootstrap_requires_email_and_password() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CAMPUS_BOOTSTRAP_EMAIL", "root@campus.edu"),
        ]))
        .unwrap();
        assert!(config.bootstrap.is_none());

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("CAMPUS_BOOTSTRAP_EMAIL", "root@campus.edu"),
            ("CAMPUS_BOOTSTRAP_PASSWORD", "changeme"),
        ]))
        .unwrap();
        let bootstrap = config.bootstrap.unwrap();
        assert_eq!(bootstrap.email, "root@campus.edu");
        assert_eq!(bootstrap.name, "Super Admin");
    }
}
