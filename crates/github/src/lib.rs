//! GitHub API client for listing closed PRs and their reviews

pub mod api;
pub mod client;

pub use api::{Page, PullsApi};
pub use client::{ClientError, GitHubClient};
