//! Error types for the shim.
//!
//! Framing and payload faults never surface here: they degrade to pass-through
//! inside the pumps. Only process and stream failures are errors.

use thiserror::Error;

/// Errors that can occur while supervising the wrapped server.
#[derive(Debug, Error)]
pub enum ShimError {
    /// Failed to spawn the wrapped server process.
    #[error("failed to spawn language server '{command}': {source}")]
    SpawnFailed {
        /// The program that failed to spawn.
        command: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A standard stream of the child was not piped.
    #[error("failed to take child {0}")]
    MissingPipe(&'static str),

    /// I/O error on one of the proxied streams.
    #[error("stream error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShimError {
    /// Create a spawn failed error.
    #[must_use]
    pub fn spawn_failed(command: &str, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            command: command.to_string(),
            source,
        }
    }
}

/// Result type for shim operations.
pub type Result<T> = std::result::Result<T, ShimError>;
