//! Domain models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A pull request as listed by the hosting API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestSummary {
    pub id: u64,
    pub number: u64,
    /// API URL of the pull request
    pub url: String,
    /// Browser URL of the pull request
    pub html_url: String,
    pub state: PrState,
    pub merged_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PrState {
    Open,
    Closed,
}

/// A PR review. Only its existence matters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewRecord {
    pub id: u64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Unit of a staleness threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hours,
    Days,
}

impl TimeUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h" => Ok(TimeUnit::Hours),
            "d" => Ok(TimeUnit::Days),
            other => Err(ConfigError::InvalidUnit(other.to_string())),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long after merging a PR without reviews becomes worth flagging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeThreshold {
    pub magnitude: u32,
    pub unit: TimeUnit,
}

impl TimeThreshold {
    pub fn new(magnitude: u32, unit: TimeUnit) -> Self {
        Self { magnitude, unit }
    }

    /// Parse the raw `amount` and `unit` inputs.
    ///
    /// The amount is trimmed and must be a positive integer; the unit must be
    /// exactly `h` or `d`.
    pub fn parse(amount: &str, unit: &str) -> Result<Self, ConfigError> {
        let magnitude = amount
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| ConfigError::InvalidAmount(amount.to_string()))?;
        let unit = unit.parse()?;
        Ok(Self { magnitude, unit })
    }

    pub fn duration(&self) -> Duration {
        let magnitude = i64::from(self.magnitude);
        match self.unit {
            TimeUnit::Hours => Duration::hours(magnitude),
            TimeUnit::Days => Duration::days(magnitude),
        }
    }
}

impl fmt::Display for TimeThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit)
    }
}
