//! Common error types for cueloop

use thiserror::Error;

/// Common result type for cueloop operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the cueloop crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
