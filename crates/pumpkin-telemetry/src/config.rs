//! Logging configuration from environment variables.

use std::env;

/// Configuration for structured logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Service name recorded on the startup log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or an `EnvFilter` directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "pumpkin".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl LogConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PUMPKIN_SERVICE_NAME`: Service name (default: pumpkin)
    /// - `PUMPKIN_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `PUMPKIN_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `PUMPKIN_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self {
            service_name: env::var("PUMPKIN_SERVICE_NAME")
                .unwrap_or_else(|_| "pumpkin".to_string()),

            log_level: env::var("PUMPKIN_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("PUMPKIN_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("PUMPKIN_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    /// Default configuration at a given level.
    pub fn with_level(log_level: &str) -> Self {
        Self {
            log_level: log_level.to_string(),
            ..Self::default()
        }
    }
}
