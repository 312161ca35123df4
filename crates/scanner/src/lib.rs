//! Detection of merged pull requests that never received a review

pub mod error;
pub mod scan;
pub mod staleness;

pub use error::ScanError;
pub use scan::{ScanResult, Scanner};
pub use staleness::is_stale;

#[cfg(test)]
mod tests;
