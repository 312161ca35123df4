//! Scan a repository's closed PRs for merges without any review

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use common::models::{PullRequestSummary, TimeThreshold};
use common::ScanSettings;
use futures::future::try_join_all;
use github::PullsApi;
use tracing::{debug, info};

use crate::error::ScanError;
use crate::staleness::is_stale;

/// Stale merged PRs with zero reviews, in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    pub unreviewed: Vec<PullRequestSummary>,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.unreviewed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.unreviewed.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PullRequestSummary> {
        self.unreviewed.iter()
    }

    /// PR numbers, as shown in reports
    pub fn numbers(&self) -> Vec<u64> {
        self.unreviewed.iter().map(|pr| pr.number).collect()
    }
}

impl<'a> IntoIterator for &'a ScanResult {
    type Item = &'a PullRequestSummary;
    type IntoIter = std::slice::Iter<'a, PullRequestSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Walks every page of closed PRs and looks up reviews for stale merges
pub struct Scanner<A> {
    api: A,
    settings: ScanSettings,
}

impl<A: PullsApi> Scanner<A> {
    pub fn new(api: A, settings: ScanSettings) -> Self {
        Self { api, settings }
    }

    /// Build a scanner from raw `amount`/`unit` inputs.
    ///
    /// Fails with [`ScanError::Config`] without touching `api`.
    pub fn from_inputs(
        api: A,
        owner: &str,
        repo: &str,
        amount: &str,
        unit: &str,
    ) -> Result<Self, ScanError> {
        let threshold = TimeThreshold::parse(amount, unit)?;
        let settings = ScanSettings {
            owner: owner.to_string(),
            repo: repo.to_string(),
            threshold,
        };
        Ok(Self::new(api, settings))
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Run a full scan against the current time
    pub async fn scan(&self) -> Result<ScanResult, ScanError> {
        self.scan_at(Utc::now()).await
    }

    /// Run a full scan, judging staleness against a fixed `now`.
    ///
    /// Pages are consumed in order; the PRs of one page are evaluated
    /// concurrently. Any API failure aborts the scan.
    pub async fn scan_at(&self, now: DateTime<Utc>) -> Result<ScanResult, ScanError> {
        let ScanSettings {
            owner,
            repo,
            threshold,
        } = &self.settings;
        info!(
            "Scanning {}/{} for PRs merged at least {} ago without review",
            owner, repo, threshold
        );

        let mut result = ScanResult::default();
        let mut seen = HashSet::new();
        let mut listed = HashSet::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 0u32;

        loop {
            page_number += 1;
            let page = self
                .api
                .list_closed_pulls(owner, repo, cursor.as_deref())
                .await?;
            let page_len = page.items.len();
            info!(
                "Fetched closed PRs page {} for {}/{} ({} PRs)",
                page_number, owner, repo, page_len
            );

            let fresh = take_unlisted(&mut listed, page.items);
            if fresh.is_empty() && page_len > 0 {
                return Err(ScanError::PaginationLoop(
                    cursor.unwrap_or_else(|| "first page".to_string()),
                ));
            }

            let flagged = try_join_all(fresh.into_iter().map(|pr| self.evaluate(pr, now))).await?;
            result.unreviewed.extend(flagged.into_iter().flatten());

            cursor = match next_cursor(&mut seen, page.next)? {
                Some(next) => Some(next),
                None => break,
            };
        }

        info!(
            "Scan complete: {} unreviewed PRs across {} pages of {}/{}",
            result.len(),
            page_number,
            owner,
            repo
        );
        Ok(result)
    }

    /// Keep `pr` only if it is merged, stale and has no reviews
    async fn evaluate(
        &self,
        pr: PullRequestSummary,
        now: DateTime<Utc>,
    ) -> Result<Option<PullRequestSummary>, ScanError> {
        let Some(merged_at) = pr.merged_at else {
            debug!("PR {} has no merged_at field", pr.html_url);
            return Ok(None);
        };

        let threshold = &self.settings.threshold;
        if !is_stale(merged_at, threshold, now) {
            debug!("PR {} was merged less than {} ago", pr.html_url, threshold);
            return Ok(None);
        }

        if self.has_reviews(pr.number).await? {
            debug!("PR {} has reviews", pr.html_url);
            return Ok(None);
        }

        debug!("PR {} was merged without review", pr.html_url);
        Ok(Some(pr))
    }

    /// Page through a PR's reviews, stopping at the first one found
    async fn has_reviews(&self, number: u64) -> Result<bool, ScanError> {
        let ScanSettings { owner, repo, .. } = &self.settings;
        let mut seen = HashSet::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .api
                .list_reviews(owner, repo, number, cursor.as_deref())
                .await?;
            if !page.items.is_empty() {
                return Ok(true);
            }

            cursor = match next_cursor(&mut seen, page.next)? {
                Some(next) => Some(next),
                None => return Ok(false),
            };
        }
    }
}

/// Drop PRs an earlier page already listed.
///
/// Offset pagination can shift a PR onto the next page when the listing
/// changes mid-scan; it is evaluated only where it first appeared.
fn take_unlisted(
    listed: &mut HashSet<u64>,
    items: Vec<PullRequestSummary>,
) -> Vec<PullRequestSummary> {
    items
        .into_iter()
        .filter(|pr| {
            let unlisted = listed.insert(pr.id);
            if !unlisted {
                debug!("PR {} already listed on an earlier page", pr.html_url);
            }
            unlisted
        })
        .collect()
}

/// Advance to `next`, refusing to revisit a page
fn next_cursor(
    seen: &mut HashSet<String>,
    next: Option<String>,
) -> Result<Option<String>, ScanError> {
    match next {
        Some(next) if !seen.insert(next.clone()) => Err(ScanError::PaginationLoop(next)),
        next => Ok(next),
    }
}
