//! Core error types for assetq.
//!
//! `AssetqError` covers failures shared by every crate; configuration problems
//! get their own enum because they are always fatal before the first request.

use crate::types::Provider;
use thiserror::Error;

/// Central error type for shared assetq operations.
#[derive(Error, Debug)]
pub enum AssetqError {
    /// Configuration errors (file loading, parsing, missing keys)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors (unknown provider name, bad input)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No API key configured for a provider
    #[error("no API key configured for {provider}; set [{provider}].key in {path}")]
    MissingApiKey {
        /// Provider lacking a key
        provider: Provider,
        /// Config file the key is read from
        path: String,
    },

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `AssetqError`.
pub type Result<T> = std::result::Result<T, AssetqError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
