//! Reporting of scan outcomes

use std::io::{self, Write};

use scanner::{ScanError, ScanResult};
use tracing::{error, info};

pub const FAILURE_MESSAGE: &str = "There are closed PRs that need code review";

/// How a check run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No unreviewed merges
    Clean,
    /// At least one unreviewed merge
    Unreviewed,
    /// The scan could not complete
    ScanFailed,
    /// Inputs were rejected before any API access
    InvalidConfig,
}

impl Outcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            Outcome::Clean => 0,
            Outcome::Unreviewed | Outcome::ScanFailed => 1,
            Outcome::InvalidConfig => 2,
        }
    }
}

/// Where the outcome is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reporter {
    /// Plain log lines
    Log,
    /// Log lines plus GitHub Actions workflow commands on stdout
    Actions,
}

impl Reporter {
    /// Pick the reporter for the running environment (`GITHUB_ACTIONS=true`)
    pub fn detect(github_actions: Option<&str>) -> Self {
        match github_actions {
            Some("true") => Reporter::Actions,
            _ => Reporter::Log,
        }
    }

    /// Render the scan outcome. Returns whether the check failed.
    pub fn report(&self, result: &ScanResult, out: &mut impl Write) -> io::Result<bool> {
        if result.is_empty() {
            info!("No unreviewed merged PRs found");
            return Ok(false);
        }

        info!("The unreviewed PRs: {}", render_numbers(result));
        for pr in result {
            info!("  #{} {}", pr.number, pr.html_url);
        }
        error!("{}", FAILURE_MESSAGE);

        if *self == Reporter::Actions {
            writeln!(out, "{}", workflow_error(FAILURE_MESSAGE))?;
        }
        Ok(true)
    }

    /// Render a finished or failed scan, exactly once
    pub fn conclude(
        &self,
        scan: &Result<ScanResult, ScanError>,
        out: &mut impl Write,
    ) -> io::Result<Outcome> {
        match scan {
            Ok(result) => {
                if self.report(result, out)? {
                    Ok(Outcome::Unreviewed)
                } else {
                    Ok(Outcome::Clean)
                }
            }
            Err(e) => {
                self.report_error(&e.to_string(), out)?;
                Ok(Outcome::ScanFailed)
            }
        }
    }

    /// Render a failure that prevented the scan from completing
    pub fn report_error(&self, message: &str, out: &mut impl Write) -> io::Result<()> {
        error!("{}", message);
        if *self == Reporter::Actions {
            writeln!(out, "{}", workflow_error(message))?;
        }
        Ok(())
    }
}

/// Flagged PR numbers as a JSON array
pub fn render_numbers(result: &ScanResult) -> String {
    serde_json::Value::from(result.numbers()).to_string()
}

/// An `::error::` workflow command, escaped per the Actions toolkit
fn workflow_error(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{}", escaped)
}
