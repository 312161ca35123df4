//! Common types and configuration for unreviewed-merge checks

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, ScanSettings};
pub use error::{ConfigError, Result};
