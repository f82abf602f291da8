//! Environment-driven configuration helpers

use crate::error::{BridgeError, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub service_name: String,
    pub http_bind: String,
}

impl ServiceConfig {
    pub fn from_env(default_name: &str) -> Result<Self> {
        Ok(Self {
            service_name: env_or("SERVICE_NAME", default_name.to_string())?,
            http_bind: env_or("HTTP_BIND", "0.0.0.0:8080".to_string())?,
        })
    }
}

/// Read `key` from the environment, falling back to `default` when unset.
///
/// A value that is set but does not parse is a configuration error rather
/// than a silent fallback.
pub fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(BridgeError::Config(format!("Invalid {}: {}", key, e))),
    }
}

/// Parse a raw configuration value, naming the key on failure
pub fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| BridgeError::Config(format!("Invalid {}: {}", key, e)))
}
