//! Engine error types.

use thiserror::Error;

/// Engine errors outside a single tool invocation.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Failed to parse an engine configuration file.
    #[error("failed to parse config: {0}")]
    Parse(String),

    /// An I/O error occurred while reading configuration.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tool invocation failed.
    #[error(transparent)]
    Tool(#[from] tools::ToolError),
}

pub type Result<T> = std::result::Result<T, Error>;
