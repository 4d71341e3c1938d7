pub mod client;
pub mod provider;
pub mod rate_limiter;
pub mod paginator;

pub use client::GitHubClient;
pub use provider::{IssueProvider, SearchProvider, SearchRequest};
pub use rate_limiter::RateLimiter;
pub use paginator::Paginator;
