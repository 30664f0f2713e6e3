//! # Pumpkin Telemetry
//!
//! Structured logging for applications built on `pumpkin-bus`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pumpkin_telemetry::{init_logging, LogConfig};
//!
//! fn main() {
//!     init_logging(&LogConfig::from_env()).expect("Failed to init logging");
//!     // Bus operations now emit `tracing` events
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PUMPKIN_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `PUMPKIN_JSON_LOGS` | `false` | Emit JSON lines instead of pretty output |
//! | `PUMPKIN_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `PUMPKIN_SERVICE_NAME` | `pumpkin` | Service name attached to the startup log |

mod config;
mod logging;

pub use config::LogConfig;
pub use logging::init_logging;

/// Serializes tests that read or write process environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: parking_lot::Mutex<()> = parking_lot::const_mutex(());

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install global subscriber: {0}")]
    SubscriberInit(String),
}
