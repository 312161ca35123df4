//! In-memory GitHub API for scanner tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::models::{PrState, PullRequestSummary, ReviewRecord};
use github::{ClientError, Page, PullsApi};

/// Call record for `list_reviews`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsCall {
    pub number: u64,
    pub cursor: Option<String>,
}

/// Mock API serving fixed pages, keyed by request cursor.
///
/// - Pull pages and review pages are chained with generated cursors
/// - Every call is recorded for verification
/// - Errors can be injected per pull page or per PR
/// - Review lookups can be delayed per PR to reorder completion
#[derive(Default)]
pub struct MockApi {
    pull_pages: HashMap<Option<String>, Page<PullRequestSummary>>,
    review_pages: HashMap<(u64, Option<String>), Page<ReviewRecord>>,
    fail_pulls_at: HashSet<Option<String>>,
    fail_reviews_for: HashSet<u64>,
    review_delays: HashMap<u64, Duration>,
    // Call tracking
    pulls_calls: Mutex<Vec<Option<String>>>,
    reviews_calls: Mutex<Vec<ReviewsCall>>,
    reviews_answered: Mutex<Vec<u64>>,
}

fn pulls_cursor(index: usize) -> Option<String> {
    (index > 0).then(|| format!("pulls?state=closed&page={}", index + 1))
}

fn reviews_cursor(number: u64, index: usize) -> Option<String> {
    (index > 0).then(|| format!("pulls/{}/reviews?page={}", number, index + 1))
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pages` of closed PRs in order
    pub fn with_pull_pages(mut self, pages: Vec<Vec<PullRequestSummary>>) -> Self {
        let count = pages.len();
        for (index, items) in pages.into_iter().enumerate() {
            let next = if index + 1 < count {
                pulls_cursor(index + 1)
            } else {
                None
            };
            self.pull_pages
                .insert(pulls_cursor(index), Page::new(items, next));
        }
        self
    }

    /// Serve an explicit page for `cursor`
    pub fn with_raw_pull_page(
        mut self,
        cursor: Option<&str>,
        page: Page<PullRequestSummary>,
    ) -> Self {
        self.pull_pages.insert(cursor.map(String::from), page);
        self
    }

    /// Serve review pages for PR `number`, each page holding that many reviews
    pub fn with_review_pages(mut self, number: u64, counts: &[usize]) -> Self {
        for (index, count) in counts.iter().enumerate() {
            let items = (0..*count).map(|i| review(number * 1000 + i as u64)).collect();
            let next = if index + 1 < counts.len() {
                reviews_cursor(number, index + 1)
            } else {
                None
            };
            self.review_pages
                .insert((number, reviews_cursor(number, index)), Page::new(items, next));
        }
        self
    }

    pub fn failing_pulls_page(mut self, index: usize) -> Self {
        self.fail_pulls_at.insert(pulls_cursor(index));
        self
    }

    pub fn failing_reviews_for(mut self, number: u64) -> Self {
        self.fail_reviews_for.insert(number);
        self
    }

    /// Delay every review lookup for PR `number`
    pub fn with_review_delay(mut self, number: u64, delay: Duration) -> Self {
        self.review_delays.insert(number, delay);
        self
    }

    pub fn pulls_calls(&self) -> Vec<Option<String>> {
        self.pulls_calls.lock().unwrap().clone()
    }

    pub fn reviews_calls(&self) -> Vec<ReviewsCall> {
        self.reviews_calls.lock().unwrap().clone()
    }

    /// PR numbers in the order their review lookups returned
    pub fn reviews_answered(&self) -> Vec<u64> {
        self.reviews_answered.lock().unwrap().clone()
    }

    /// Reviews calls made for one PR, in order
    pub fn reviews_calls_for(&self, number: u64) -> Vec<Option<String>> {
        self.reviews_calls()
            .into_iter()
            .filter(|c| c.number == number)
            .map(|c| c.cursor)
            .collect()
    }
}

#[async_trait]
impl PullsApi for MockApi {
    async fn list_closed_pulls(
        &self,
        _owner: &str,
        _repo: &str,
        cursor: Option<&str>,
    ) -> Result<Page<PullRequestSummary>, ClientError> {
        let cursor = cursor.map(String::from);
        self.pulls_calls.lock().unwrap().push(cursor.clone());

        if self.fail_pulls_at.contains(&cursor) {
            return Err(ClientError::Api {
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }
        match self.pull_pages.get(&cursor) {
            Some(page) => Ok(page.clone()),
            None if cursor.is_none() => Ok(Page::last(Vec::new())),
            None => Err(ClientError::NotFound(format!("{:?}", cursor))),
        }
    }

    async fn list_reviews(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
        cursor: Option<&str>,
    ) -> Result<Page<ReviewRecord>, ClientError> {
        let cursor = cursor.map(String::from);
        self.reviews_calls.lock().unwrap().push(ReviewsCall {
            number,
            cursor: cursor.clone(),
        });

        if let Some(delay) = self.review_delays.get(&number) {
            tokio::time::sleep(*delay).await;
        }
        self.reviews_answered.lock().unwrap().push(number);
        if self.fail_reviews_for.contains(&number) {
            return Err(ClientError::RateLimited { retry_after: 30 });
        }
        match self.review_pages.get(&(number, cursor.clone())) {
            Some(page) => Ok(page.clone()),
            None if cursor.is_none() => Ok(Page::last(Vec::new())),
            None => Err(ClientError::NotFound(format!("{:?}", cursor))),
        }
    }
}

pub fn merged_pr(number: u64, merged_at: DateTime<Utc>) -> PullRequestSummary {
    PullRequestSummary {
        merged_at: Some(merged_at),
        ..closed_pr(number)
    }
}

pub fn closed_pr(number: u64) -> PullRequestSummary {
    PullRequestSummary {
        id: 100_000 + number,
        number,
        url: format!("https://api.github.com/repos/octocat/hello/pulls/{}", number),
        html_url: format!("https://github.com/octocat/hello/pull/{}", number),
        state: PrState::Closed,
        merged_at: None,
    }
}

pub fn review(id: u64) -> ReviewRecord {
    ReviewRecord {
        id,
        state: Some("APPROVED".to_string()),
        submitted_at: None,
    }
}
