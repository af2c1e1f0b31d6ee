//! Client error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    /// Config file missing or unreadable. Callers treat this as fatal.
    #[error("Can't read config file '{}': {}", .path.display(), .source)]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Boolean option given something other than yes/no style literal
    #[error("Config: value of option '{option}' must be Yes or No, not '{value}'")]
    InvalidBooleanLiteral { option: String, value: String },

    /// Integer option given a non-numeric value
    #[error("Config: value of option '{option}' must be an integer, not '{value}'")]
    InvalidInteger { option: String, value: String },

    /// Option name not in the option table
    #[error("Config: unknown option '{0}'")]
    UnknownOption(String),

    /// `encoding` key names an encoding we can't decode
    #[error("Config: unknown encoding '{0}'")]
    UnknownEncoding(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Check if this is a fatal config read failure
    pub fn is_config_read(&self) -> bool {
        matches!(self, Self::ConfigRead { .. })
    }

    /// Check if this error came from a bad option value
    pub fn is_invalid_value(&self) -> bool {
        matches!(
            self,
            Self::InvalidBooleanLiteral { .. } | Self::InvalidInteger { .. }
        )
    }
}
