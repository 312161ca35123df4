//! Error types

use thiserror::Error;

/// Invalid or missing inputs, detected before any API access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid amount {0:?}, please set to a positive number")]
    InvalidAmount(String),

    #[error("invalid unit {0:?}, only \"h\" or \"d\" accepted")]
    InvalidUnit(String),

    #[error("missing required input: {0}")]
    Missing(&'static str),

    #[error("invalid repository {0:?}, expected \"owner/name\"")]
    InvalidRepository(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ConfigError>;
