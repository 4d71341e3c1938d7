use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::ScanConfig;
use crate::error::{Error, Result};
use crate::github::{SearchProvider, SearchRequest};
use crate::models::{QueryOutcome, RepositoryRecord};

pub struct QueryRunner {
    search: Arc<dyn SearchProvider>,
    show_progress: bool,
}

impl QueryRunner {
    pub fn new(search: Arc<dyn SearchProvider>) -> Self {
        Self {
            search,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Run every configured query in order. A failing query yields a
    /// failed outcome and never stops the ones after it.
    pub async fn run(&self, config: &ScanConfig, window_start: DateTime<Utc>) -> Vec<QueryOutcome> {
        let queries: Vec<&str> = config
            .queries
            .iter()
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
            .collect();

        let pb = self.progress_bar(queries.len() as u64);
        let mut outcomes = Vec::with_capacity(queries.len());

        for query in queries {
            pb.set_message(query.to_string());
            let request = SearchRequest {
                query: query.to_string(),
                created_after: window_start,
                per_page: config.per_page,
                max_pages: config.max_pages,
            };

            let outcome = match self.search_with_retry(&request).await {
                Ok(records) => {
                    let records = retain_new_originals(records, window_start);
                    tracing::info!("Search '{}': found {} repos", query, records.len());
                    QueryOutcome::found(query, records)
                }
                Err(e) => {
                    tracing::warn!("Search '{}' failed, continuing without it: {}", query, e);
                    QueryOutcome::failed(query, e.to_string())
                }
            };

            outcomes.push(outcome);
            pb.inc(1);
        }

        pb.finish_and_clear();
        outcomes
    }

    async fn search_with_retry(&self, request: &SearchRequest) -> Result<Vec<RepositoryRecord>> {
        match self.search.search_repositories(request).await {
            Err(e) if e.is_retryable() => {
                let delay = match &e {
                    Error::RateLimited(secs) => *secs,
                    _ => 2,
                };
                tracing::info!("Search '{}' hit {}, retrying once in {}s", request.query, e, delay);
                tokio::time::sleep(std::time::Duration::from_secs(delay)).await;
                self.search.search_repositories(request).await
            }
            result => result,
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} queries {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}

pub fn window_start(now: DateTime<Utc>, lookback_hours: u32) -> DateTime<Utc> {
    now - Duration::hours(i64::from(lookback_hours))
}

/// Drop forks and anything created before the window, whatever the API
/// returned.
fn retain_new_originals(
    records: Vec<RepositoryRecord>,
    window_start: DateTime<Utc>,
) -> Vec<RepositoryRecord> {
    records
        .into_iter()
        .filter(|r| !r.fork && r.created_at >= window_start)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 6, 0, 0).unwrap()
    }

    fn record(owner: &str, name: &str, fork: bool, hours_ago: i64) -> RepositoryRecord {
        RepositoryRecord {
            owner: owner.to_string(),
            name: name.to_string(),
            description: None,
            url: format!("https://github.com/{}/{}", owner, name),
            stars: 0,
            fork,
            created_at: now() - Duration::hours(hours_ago),
            language: None,
            topics: Vec::new(),
        }
    }

    struct FakeSearch {
        results: HashMap<String, Vec<RepositoryRecord>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for FakeSearch {
        async fn search_repositories(&self, request: &SearchRequest) -> Result<Vec<RepositoryRecord>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.results
                .get(&request.query)
                .cloned()
                .ok_or_else(|| Error::GitHubApi(format!("422 for {}", request.query)))
        }
    }

    /// Rate limited on the first call, then succeeds.
    struct FlakySearch {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for FlakySearch {
        async fn search_repositories(&self, _request: &SearchRequest) -> Result<Vec<RepositoryRecord>> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(Error::RateLimited(0))
            } else {
                Ok(vec![record("alice", "viewer", false, 1)])
            }
        }
    }

    fn config(queries: &[&str]) -> ScanConfig {
        ScanConfig {
            queries: queries.iter().map(|q| q.to_string()).collect(),
            ..ScanConfig::default()
        }
    }

    #[tokio::test]
    async fn test_failed_query_does_not_abort_the_rest() {
        let mut results = HashMap::new();
        results.insert("first".to_string(), vec![record("a", "one", false, 2)]);
        results.insert("third".to_string(), vec![record("c", "three", false, 3)]);
        let search = Arc::new(FakeSearch {
            results,
            calls: AtomicUsize::new(0),
        });

        let runner = QueryRunner::new(search.clone());
        let outcomes = runner
            .run(&config(&["first", "second", "third"]), window_start(now(), 24))
            .await;

        assert_eq!(search.calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].records.len(), 1);
        assert!(outcomes[1].is_failed());
        assert!(outcomes[1].records.is_empty());
        assert_eq!(outcomes[2].records[0].name, "three");
    }

    #[tokio::test]
    async fn test_forks_and_old_repos_are_dropped() {
        let mut results = HashMap::new();
        results.insert(
            "splat".to_string(),
            vec![
                record("a", "fresh", false, 5),
                record("b", "forked", true, 5),
                record("c", "stale", false, 30),
            ],
        );
        let runner = QueryRunner::new(Arc::new(FakeSearch {
            results,
            calls: AtomicUsize::new(0),
        }));

        let outcomes = runner.run(&config(&["splat"]), window_start(now(), 24)).await;
        let names: Vec<_> = outcomes[0].records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_blank_queries_are_skipped() {
        let search = Arc::new(FakeSearch {
            results: HashMap::from([("splat".to_string(), Vec::new())]),
            calls: AtomicUsize::new(0),
        });
        let outcomes = QueryRunner::new(search.clone())
            .run(&config(&["", "splat", "  "]), window_start(now(), 24))
            .await;
        assert_eq!(outcomes.len(), 1);
        assert_eq!(search.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_query_is_retried_once() {
        let search = Arc::new(FlakySearch {
            calls: AtomicUsize::new(0),
        });
        let outcomes = QueryRunner::new(search.clone())
            .run(&config(&["splat"]), window_start(now(), 24))
            .await;

        assert_eq!(search.calls.load(Ordering::SeqCst), 2);
        assert!(!outcomes[0].is_failed());
        assert_eq!(outcomes[0].records.len(), 1);
    }

    #[test]
    fn test_window_start() {
        assert_eq!(
            window_start(now(), 24),
            Utc.with_ymd_and_hms(2026, 10, 15, 6, 0, 0).unwrap()
        );
    }
}
