//! GitHub REST API client for listing PRs and reviews

use async_trait::async_trait;
use common::config::DEFAULT_API_URL;
use common::models::{PullRequestSummary, ReviewRecord};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, LINK, USER_AGENT};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::api::{Page, PullsApi};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Rate limited, retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// GitHub API client
pub struct GitHubClient {
    client: reqwest::Client,
    token: Option<String>,
    api_url: String,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Client for a GitHub Enterprise (or otherwise relocated) API root
    pub fn with_api_url(token: Option<String>, api_url: impl Into<String>) -> Self {
        let client = reqwest::Client::new();
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            token,
            api_url,
        }
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("unreviewed-merges/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        if let Some(ref token) = self.token {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    /// Fetch a single page and the URL of the page after it
    async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>, ClientError> {
        debug!("GET {}", url);
        let resp = self.client.get(url).headers(self.headers()).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(url.to_string()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS
            || (status == reqwest::StatusCode::FORBIDDEN && is_rate_limited(resp.headers()))
        {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let next = resp
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_link_next);
        let body = resp.text().await?;
        let items = serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })?;

        Ok(Page::new(items, next))
    }
}

#[async_trait]
impl PullsApi for GitHubClient {
    /// GitHub returns newest first by default (sorted by created desc).
    async fn list_closed_pulls(
        &self,
        owner: &str,
        repo: &str,
        cursor: Option<&str>,
    ) -> Result<Page<PullRequestSummary>, ClientError> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!(
                "{}/repos/{}/{}/pulls?state=closed",
                self.api_url, owner, repo
            ),
        };
        self.get_page(&url).await
    }

    async fn list_reviews(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        cursor: Option<&str>,
    ) -> Result<Page<ReviewRecord>, ClientError> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => format!(
                "{}/repos/{}/{}/pulls/{}/reviews",
                self.api_url, owner, repo, number
            ),
        };
        self.get_page(&url).await
    }
}

/// A 403 is only a rate limit when the quota headers say so
fn is_rate_limited(headers: &HeaderMap) -> bool {
    headers.contains_key("retry-after")
        || headers
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim() == "0")
}

/// Parse the `Link` header to find the `rel="next"` URL.
fn parse_link_next(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let (target, params) = part.trim().split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().replace(' ', "") == "rel=\"next\"");
        if !is_next {
            return None;
        }
        let url = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        Some(url.to_string())
    })
}
