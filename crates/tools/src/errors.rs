//! Tool invocation error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while invoking a tool.
///
/// `NotFound` and `Timeout` are produced by the engine itself. `InvalidArguments`
/// and `Execution` are normally produced by the tool and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolError {
    /// No tool with this name is registered and no fallback was configured.
    #[error("tool not found: {name}")]
    NotFound { name: String },

    /// The deadline elapsed (or the caller cancelled) before the tool finished.
    #[error("tool {tool} timed out after {elapsed_ms}ms")]
    Timeout { tool: String, elapsed_ms: u64 },

    /// Arguments could not be decoded or had the wrong shape.
    #[error("invalid arguments for {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// The tool ran and reported a failure.
    #[error("tool {tool} failed: {reason}")]
    Execution { tool: String, reason: String },
}

/// Classification of a [`ToolError`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Timeout,
    InvalidArguments,
    Execution,
}

impl ToolError {
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn timeout(tool: impl Into<String>, elapsed_ms: u64) -> Self {
        Self::Timeout {
            tool: tool.into(),
            elapsed_ms,
        }
    }

    pub fn invalid_arguments(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    pub fn execution(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Execution {
            tool: tool.into(),
            reason: reason.into(),
        }
    }

    /// The classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::InvalidArguments { .. } => ErrorKind::InvalidArguments,
            Self::Execution { .. } => ErrorKind::Execution,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
