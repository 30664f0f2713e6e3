//! Bus configuration from environment variables.

use crate::error::BusError;
use crate::DEFAULT_NAMESPACE;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// What `publish` does when a subscriber panics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep delivering to the remaining subscribers.
    #[default]
    Isolate,
    /// Stop delivery and return the failure to the publisher.
    Abort,
}

impl FromStr for FailurePolicy {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isolate" => Ok(Self::Isolate),
            "abort" => Ok(Self::Abort),
            _ => Err(BusError::InvalidFailurePolicy(s.to_string())),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isolate => f.write_str("isolate"),
            Self::Abort => f.write_str("abort"),
        }
    }
}

/// Configuration for an [`EventBus`](crate::EventBus).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Namespace whose registry the bus shares
    pub namespace: String,

    /// Subscriber panic handling
    pub failure_policy: FailurePolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl BusConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PUMPKIN_NAMESPACE`: Namespace name (default: PumpkinPatch)
    /// - `PUMPKIN_FAILURE_POLICY`: `isolate` or `abort` (default: isolate)
    pub fn from_env() -> Self {
        let namespace = env::var("PUMPKIN_NAMESPACE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        let failure_policy = match env::var("PUMPKIN_FAILURE_POLICY") {
            Ok(raw) => raw.parse::<FailurePolicy>().unwrap_or_else(|e: BusError| {
                warn!(error = %e, "Falling back to default failure policy");
                FailurePolicy::default()
            }),
            Err(_) => FailurePolicy::default(),
        };

        Self {
            namespace,
            failure_policy,
        }
    }

    /// Configuration for a specific namespace.
    pub fn for_namespace(namespace: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }
}
