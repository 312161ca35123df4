//! Capability surface the scanner needs from a pull request host

use async_trait::async_trait;
use common::models::{PullRequestSummary, ReviewRecord};

use crate::client::ClientError;

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Opaque cursor for the following page, `None` once exhausted
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next: Option<String>) -> Self {
        Self { items, next }
    }

    /// A page with no successor
    pub fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Paginated read access to pull requests and their reviews.
///
/// `cursor` is `None` for the first page and otherwise the `next` value of
/// the previously returned page.
#[async_trait]
pub trait PullsApi: Send + Sync {
    /// List closed pull requests, in the host's order
    async fn list_closed_pulls(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<Page<PullRequestSummary>, ClientError>;

    /// List reviews submitted on a pull request
    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cursor: Option<&str>,
    ) -> Result<Page<ReviewRecord>, ClientError>;
}
