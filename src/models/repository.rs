use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Body of `GET /search/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchRepository>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchRepository {
    pub name: String,
    pub full_name: String,
    pub owner: RepositoryOwner,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u32,
    pub fork: bool,
    pub created_at: DateTime<Utc>,
    pub language: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryOwner {
    pub login: String,
}

/// A repository found by a search query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRecord {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub fork: bool,
    pub created_at: DateTime<Utc>,
    pub language: Option<String>,
    pub topics: Vec<String>,
}

impl RepositoryRecord {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn id(&self) -> RepoId {
        RepoId::new(&self.owner, &self.name)
    }
}

impl From<SearchRepository> for RepositoryRecord {
    fn from(repo: SearchRepository) -> Self {
        Self {
            owner: repo.owner.login,
            name: repo.name,
            description: repo.description.filter(|d| !d.trim().is_empty()),
            url: repo.html_url,
            stars: repo.stargazers_count,
            fork: repo.fork,
            created_at: repo.created_at,
            language: repo.language,
            topics: repo.topics,
        }
    }
}

/// Repository identity. GitHub owner and repository names are
/// case-insensitive, so both parts are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_lowercase(),
            name: name.to_lowercase(),
        }
    }
}
