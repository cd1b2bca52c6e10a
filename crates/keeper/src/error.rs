//! Error types for the keeper service

use synthpool_types::SynthPoolError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeeperError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Subgraph error: {0}")]
    Subgraph(String),

    #[error(transparent)]
    Protocol(#[from] SynthPoolError),
}

impl KeeperError {
    /// Transport-level failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, KeeperError::NetworkError(_))
    }
}

impl From<std::io::Error> for KeeperError {
    fn from(err: std::io::Error) -> Self {
        KeeperError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KeeperError {
    fn from(err: serde_json::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for KeeperError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            KeeperError::SerializationError(err.to_string())
        } else {
            KeeperError::NetworkError(err.to_string())
        }
    }
}

impl From<config::ConfigError> for KeeperError {
    fn from(err: config::ConfigError) -> Self {
        KeeperError::InvalidConfig(err.to_string())
    }
}

impl From<toml::ser::Error> for KeeperError {
    fn from(err: toml::ser::Error) -> Self {
        KeeperError::SerializationError(err.to_string())
    }
}

pub type KeeperResult<T> = std::result::Result<T, KeeperError>;
