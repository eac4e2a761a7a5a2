//! Error types for lockwatch-core
//!
//! The correlation engine itself never fails: missing or partial introspection
//! data degrades to `None`/empty per lookup. Errors here cover the seams around
//! the engine — collaborator sources, configuration, serialization.

use thiserror::Error;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lockwatch-core
#[derive(Error, Debug)]
pub enum Error {
    /// A snapshot source failed outright (not just a single missing view)
    #[error("Snapshot source error ({view}): {message}")]
    Source {
        /// Which introspection view failed (e.g. "data_locks", "processlist")
        view: String,
        /// Underlying failure description
        message: String,
    },

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a source error for a named introspection view.
    #[must_use]
    pub fn source(view: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            view: view.into(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Path that was attempted
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Config file could not be parsed as TOML
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Path that was attempted
        path: String,
        /// Underlying TOML error
        source: toml::de::Error,
    },
}
