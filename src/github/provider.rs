use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::IssueTarget;
use crate::error::Result;
use crate::models::{CreatedIssue, NewIssue, RepositoryRecord};

/// One repository search, scoped to repositories created after a cutoff.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub created_after: DateTime<Utc>,
    pub per_page: u32,
    pub max_pages: u32,
}

impl SearchRequest {
    /// The `q` parameter sent to the search endpoint.
    pub fn qualified_query(&self) -> String {
        format!(
            "{} created:>={} fork:false",
            self.query.trim(),
            self.created_after.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search_repositories(&self, request: &SearchRequest) -> Result<Vec<RepositoryRecord>>;
}

#[async_trait]
pub trait IssueProvider: Send + Sync {
    async fn create_issue(&self, target: &IssueTarget, issue: &NewIssue) -> Result<CreatedIssue>;
}
