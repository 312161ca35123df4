//! Scan errors

use common::ConfigError;
use github::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Scan aborted: {0}")]
    Transport(#[from] ClientError),
    #[error("Pagination returned an already visited page: {0}")]
    PaginationLoop(String),
}

impl ScanError {
    /// Whether the scan was rejected before any API access
    pub fn is_config(&self) -> bool {
        matches!(self, ScanError::Config(_))
    }
}
