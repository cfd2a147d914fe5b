//! Error types
//!
//! The simulation itself has no failure modes; only loading configuration can fail,
//! and those failures are fatal at startup.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("level list is empty")]
    NoLevels,

    #[error("level {index} is invalid: {reason}")]
    InvalidLevel { index: usize, reason: &'static str },
}
