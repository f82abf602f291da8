//! Configuration for the operator console

use bridge_backend_sdk::BackendConfig;
use bridge_core::{env_or, parse_value, BridgeError, Result, ServiceConfig};
use std::net::SocketAddr;
use std::time::Duration;

use crate::i18n::Language;

pub const DEFAULT_BACKEND_URL: &str = "https://nehes-israel-system-backend.onrender.com";

/// Operator console configuration
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub service: ServiceConfig,
    /// Telephony backend base URL
    pub backend_url: String,
    pub backend_timeout: Duration,
    /// History polling interval
    pub history_poll_interval: Duration,
    /// How long a triple-call status stays visible
    pub triple_status_ttl: Duration,
    /// Number of customer slots on the dial pad
    pub customer_slots: usize,
    pub language: Language,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                service_name: "operator-console".to_string(),
                http_bind: "0.0.0.0:8080".to_string(),
            },
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            backend_timeout: Duration::from_secs(30),
            history_poll_interval: Duration::from_secs(10),
            triple_status_ttl: Duration::from_secs(5),
            customer_slots: 3,
            language: Language::En,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            service: ServiceConfig::from_env("operator-console")?,
            backend_url: env_or("BACKEND_URL", DEFAULT_BACKEND_URL.to_string())?,
            backend_timeout: Duration::from_secs(env_or("BACKEND_TIMEOUT_SECS", 30)?),
            history_poll_interval: Duration::from_secs(env_or("HISTORY_POLL_SECS", 10)?),
            triple_status_ttl: Duration::from_secs(env_or("TRIPLE_STATUS_TTL_SECS", 5)?),
            customer_slots: env_or("CUSTOMER_SLOTS", 3)?,
            language: env_or("CONSOLE_LANGUAGE", Language::En)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.customer_slots == 0 {
            return Err(BridgeError::Config("CUSTOMER_SLOTS must be at least 1".into()));
        }
        if self.history_poll_interval.is_zero() {
            return Err(BridgeError::Config("HISTORY_POLL_SECS must be positive".into()));
        }
        if self.triple_status_ttl.is_zero() {
            return Err(BridgeError::Config("TRIPLE_STATUS_TTL_SECS must be positive".into()));
        }
        if self.backend_timeout.is_zero() {
            return Err(BridgeError::Config("BACKEND_TIMEOUT_SECS must be positive".into()));
        }
        if self.backend_url.trim().is_empty() {
            return Err(BridgeError::Config("BACKEND_URL must not be empty".into()));
        }
        self.bind_address()?;
        Ok(())
    }

    /// Get socket address for binding
    pub fn bind_address(&self) -> Result<SocketAddr> {
        parse_value("HTTP_BIND", &self.service.http_bind)
    }

    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            base_url: self.backend_url.clone(),
            request_timeout: self.backend_timeout,
        }
    }
}
