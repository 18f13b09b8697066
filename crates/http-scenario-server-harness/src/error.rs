use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a mock server setup
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to read fixture {}: {source}", path.display())]
    FixtureError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
