use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::time::Duration;

use crate::config::IssueTarget;
use crate::error::{Error, Result};
use crate::github::paginator::Paginator;
use crate::github::provider::{IssueProvider, SearchProvider, SearchRequest};
use crate::github::rate_limiter::RateLimiter;
use crate::models::{CreatedIssue, NewIssue, RepositoryRecord};

pub const GITHUB_API_URL: &str = "https://api.github.com";

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("splatscan/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::default(),
            base_url: GITHUB_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SearchProvider for GitHubClient {
    async fn search_repositories(&self, request: &SearchRequest) -> Result<Vec<RepositoryRecord>> {
        let url = format!("{}/search/repositories", self.base_url);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_search(&url, request).await
    }
}

#[async_trait]
impl IssueProvider for GitHubClient {
    async fn create_issue(&self, target: &IssueTarget, issue: &NewIssue) -> Result<CreatedIssue> {
        let url = format!("{}/repos/{}/{}/issues", self.base_url, target.owner, target.repo);
        tracing::debug!("Creating issue on {}: {}", target, issue.title);

        let response = self.client.post(&url).json(issue).send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
            return Err(Error::GitHubApi(format!(
                "Repository {} not found or has issues disabled",
                target
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GitHubApi(format!(
                "Failed to create issue on {}: {} - {}",
                target, status, body
            )));
        }

        Ok(response.json().await?)
    }
}
