//! Logging configuration read from the environment

/// Output encoding for log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line, for log shippers
    Json,
    /// Compact human-readable lines
    Text,
}

impl LogFormat {
    /// `JSON_LOGS` value: "false"/"0"/"no"/"off" select text, anything else JSON
    pub fn from_flag(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "false" | "0" | "no" | "off" => Self::Text,
            _ => Self::Json,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub service_name: String,
    /// Fallback filter directive when `RUST_LOG` is unset
    pub default_filter: String,
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "bridge-service".to_string(),
            default_filter: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

impl TelemetryConfig {
    pub fn from_env(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            format: std::env::var("JSON_LOGS")
                .map(|v| LogFormat::from_flag(&v))
                .unwrap_or(LogFormat::Json),
            ..Self::default()
        }
    }
}
