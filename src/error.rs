//! Error types for roster loading and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a roster or resolving settings.
#[derive(Debug, Error)]
pub enum Error {
    /// The roster file could not be read.
    #[error("Failed to read roster {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The roster file is not valid roster JSON.
    #[error("Failed to parse roster: {0}")]
    Parse(#[from] serde_json::Error),

    /// A configuration layer could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A tab identifier did not name a known tab.
    #[error("Unknown tab: {0}")]
    UnknownTab(String),

    /// A sort mode identifier did not name a known mode.
    #[error("Unknown sort mode: {0}")]
    UnknownSortMode(String),
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
