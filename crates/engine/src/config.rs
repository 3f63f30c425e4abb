//! Engine configuration loaded from TOML.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub executor: ExecutorConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Single-call executor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Per-invocation timeout in milliseconds. Zero disables it.
    #[serde(default)]
    pub timeout_ms: u64,

    /// Cancel the tool's context once the executor stops waiting on it.
    #[serde(default = "default_cancel_on_timeout")]
    pub cancel_on_timeout: bool,
}

fn default_cancel_on_timeout() -> bool {
    true
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 0,
            cancel_on_timeout: default_cancel_on_timeout(),
        }
    }
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// Batch resolver settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Run batches of more than one call concurrently.
    #[serde(default)]
    pub concurrent: bool,

    #[serde(default)]
    pub fallback_continues: FallbackContinuation,
}

/// Which failures a configured fallback lets a sequential batch run past.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackContinuation {
    /// Any per-call failure is recorded and the batch keeps going.
    #[default]
    AllErrors,
    /// Only failures of calls routed to the fallback are tolerated; any other
    /// failure stops the batch and becomes the aggregate error.
    NotFoundOnly,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))
    }
}
