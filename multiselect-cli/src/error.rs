//! Demo error types

use std::path::PathBuf;

use multiselect_lib::error::FetchError;

/// Errors that stop the demo.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// The config file could not be read.
    #[error("Failed to read {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`DemoConfig`](crate::config::DemoConfig).
    #[error("Invalid config {path}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configured origin is not a URL.
    #[error("Invalid origin: {0}")]
    Origin(#[from] FetchError),

    /// Log file setup failed.
    #[error("Failed to set up logging: {0}")]
    Logging(String),

    /// Terminal IO failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
