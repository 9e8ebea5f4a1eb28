//! Configuration loading error types

use std::path::PathBuf;

/// Errors that can occur while loading raw grid options.
///
/// Resolution itself never fails; these only cover reading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The options file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The options document is not valid JSON for the expected shape.
    #[error("invalid grid options: {0}")]
    Parse(#[from] serde_json::Error),
}
