//! One-shot check for merged PRs that never received a review

use std::env;
use std::io;
use std::process::ExitCode;

use common::Config;
use github::GitHubClient;
use scanner::Scanner;
use tracing::info;

mod report;

use report::{Outcome, Reporter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("unreviewed_merges=debug".parse()?)
                .add_directive("scanner=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let reporter = Reporter::detect(env::var("GITHUB_ACTIONS").ok().as_deref());
    let mut stdout = io::stdout();

    // Load and validate configuration before any network access
    let config = Config::from_env();
    let settings = match config.scan_settings() {
        Ok(settings) => settings,
        Err(e) => {
            reporter.report_error(&e.to_string(), &mut stdout)?;
            return Ok(ExitCode::from(Outcome::InvalidConfig.exit_code()));
        }
    };

    info!(
        "🔍 Checking {}/{} (threshold: {})",
        settings.owner, settings.repo, settings.threshold
    );

    let client = GitHubClient::with_api_url(config.github_token.clone(), &config.api_url);
    let scanner = Scanner::new(client, settings);

    let outcome = reporter.conclude(&scanner.scan().await, &mut stdout)?;
    Ok(ExitCode::from(outcome.exit_code()))
}
