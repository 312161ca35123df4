//! Application configuration

use std::env;

use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::models::TimeThreshold;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Raw inputs read from the invoking environment
#[derive(Debug, Clone)]
pub struct Config {
    pub amount: Option<String>,
    pub unit: Option<String>,
    pub github_token: Option<String>,
    /// `owner/name`
    pub repository: Option<String>,
    pub api_url: String,
}

/// Validated inputs for a single scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSettings {
    pub owner: String,
    pub repo: String,
    pub threshold: TimeThreshold,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, preferring GitHub Actions inputs
    /// (`INPUT_*`) over plain variables. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let first = |keys: &[&str]| {
            keys.iter().find_map(|&key| {
                let value = lookup(key).filter(|v| !v.trim().is_empty())?;
                debug!("Read {} from environment", key);
                Some(value)
            })
        };

        Self {
            amount: first(&["INPUT_AMOUNT", "AMOUNT"]),
            unit: first(&["INPUT_UNIT", "UNIT"]),
            github_token: first(&["INPUT_GITHUB-TOKEN", "INPUT_GITHUB_TOKEN", "GITHUB_TOKEN"]),
            repository: first(&["GITHUB_REPOSITORY"]),
            api_url: first(&["GITHUB_API_URL"])
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        }
    }

    /// Validate the threshold and repository identity
    pub fn scan_settings(&self) -> Result<ScanSettings> {
        let amount = self.amount.as_deref().ok_or(ConfigError::Missing("amount"))?;
        let unit = self.unit.as_deref().ok_or(ConfigError::Missing("unit"))?;
        let threshold = TimeThreshold::parse(amount, unit)?;

        let repository = self
            .repository
            .as_deref()
            .ok_or(ConfigError::Missing("GITHUB_REPOSITORY"))?;
        let (owner, repo) = parse_repository(repository)?;

        Ok(ScanSettings {
            owner,
            repo,
            threshold,
        })
    }
}

/// Split `owner/name` into its halves
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    let invalid = || ConfigError::InvalidRepository(repository.to_string());
    let (owner, repo) = repository.trim().split_once('/').ok_or_else(invalid)?;
    if owner.is_empty() || repo.is_empty() || repo.contains('/') {
        return Err(invalid());
    }
    Ok((owner.to_string(), repo.to_string()))
}
