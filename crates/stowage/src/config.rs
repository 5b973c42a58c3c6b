use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{StowageError, StowageResult};

/// Configuration for a [`Stowage`](crate::Stowage) facade.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StowageConfig {
    /// Install a [`LoggingInterceptor`](crate::interceptors::LoggingInterceptor)
    /// at the head of the interceptor chain.
    pub log_operations: bool,
    /// Operations slower than this are logged at `warn`.
    pub slow_operation_threshold_ms: u64,
}

impl Default for StowageConfig {
    fn default() -> Self {
        Self {
            log_operations: false,
            slow_operation_threshold_ms: 250,
        }
    }
}

impl StowageConfig {
    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> StowageResult<Self> {
        toml::from_str(source).map_err(|e| StowageError::Config(e.to_string()))
    }

    pub fn slow_operation_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_operation_threshold_ms)
    }
}
