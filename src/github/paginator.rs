use reqwest::{Client, StatusCode};

use crate::error::{Error, Result};
use crate::github::provider::SearchRequest;
use crate::github::rate_limiter::{quota_exhausted, reset_in_secs, RateLimiter};
use crate::models::{RepositoryRecord, SearchResponse};

/// The search API never returns results past the first 1000 hits.
const SEARCH_RESULT_CEILING: u64 = 1000;

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimiter,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimiter) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    pub async fn fetch_search(
        &self,
        url: &str,
        request: &SearchRequest,
    ) -> Result<Vec<RepositoryRecord>> {
        let query = request.qualified_query();
        let per_page = request.per_page.clamp(1, 100);
        let max_pages = request.max_pages.max(1);
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            self.rate_limiter.wait().await;

            tracing::debug!("Searching page {}: {}", page, query);
            let per_page_param = per_page.to_string();
            let page_param = page.to_string();
            let response = self
                .client
                .get(url)
                .query(&[
                    ("q", query.as_str()),
                    ("sort", "created"),
                    ("order", "desc"),
                    ("per_page", per_page_param.as_str()),
                    ("page", page_param.as_str()),
                ])
                .send()
                .await?;
            self.rate_limiter.update_from_headers(response.headers()).await;

            let status = response.status();
            if matches!(status, StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS)
                && quota_exhausted(response.headers())
            {
                let wait = reset_in_secs(response.headers()).unwrap_or(60);
                return Err(Error::RateLimited(wait));
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::GitHubApi(format!(
                    "Search '{}' failed: {} - {}",
                    request.query, status, body
                )));
            }

            let body = response.text().await?;
            let data = parse_search_body(&body)?;

            if data.incomplete_results {
                tracing::warn!("Search '{}' returned incomplete results", request.query);
            }

            let items_count = data.items.len();
            all_items.extend(data.items.into_iter().map(RepositoryRecord::from));

            let seen = (page * per_page) as u64;
            if page >= max_pages
                || items_count < per_page as usize
                || seen >= data.total_count
                || seen >= SEARCH_RESULT_CEILING
            {
                break;
            }

            page += 1;
        }

        Ok(all_items)
    }
}

fn parse_search_body(body: &str) -> Result<SearchResponse> {
    serde_json::from_str(body)
        .map_err(|e| Error::ParseError(format!("Malformed search response: {}", e)))
}
