use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    HttpRequestError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("{provider} API request failed: HTTP {status} body={body}")]
    MetadataApiError {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid directory: '{}'", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Destination already exists: '{}'", .0.display())]
    DestinationExists(PathBuf),

    #[error("Other error: {0}")]
    Other(String),
}
