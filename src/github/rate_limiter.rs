use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqwest::header::HeaderMap;
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

/// GitHub allows 30 authenticated search requests per minute.
pub const SEARCH_REQUESTS_PER_MINUTE: u32 = 30;

pub struct RateLimiter {
    state: Arc<Mutex<RateLimitState>>,
    per_minute: u32,
}

struct RateLimitState {
    remaining: Option<u32>,
    reset_at: Option<Instant>,
    requests_this_minute: u32,
    minute_start: Instant,
}

impl RateLimiter {
    pub fn new(per_minute: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(RateLimitState {
                remaining: None,
                reset_at: None,
                requests_this_minute: 0,
                minute_start: Instant::now(),
            })),
            per_minute: per_minute.max(1),
        }
    }

    pub async fn wait(&self) {
        let mut state = self.state.lock().await;

        if state.remaining == Some(0) {
            if let Some(reset_at) = state.reset_at {
                let now = Instant::now();
                if reset_at > now {
                    let wait_duration = reset_at - now;
                    drop(state);
                    tracing::info!("Search quota exhausted, waiting {:?}", wait_duration);
                    sleep(wait_duration).await;
                    state = self.state.lock().await;
                }
            }
            state.remaining = None;
        }

        let minute_elapsed = state.minute_start.elapsed();
        if minute_elapsed < Duration::from_secs(60) {
            if state.requests_this_minute >= self.per_minute {
                let wait_time = Duration::from_secs(60) - minute_elapsed;
                drop(state);
                tracing::debug!("Soft rate limiting, waiting {:?}", wait_time);
                sleep(wait_time).await;
                state = self.state.lock().await;
                state.requests_this_minute = 0;
                state.minute_start = Instant::now();
            }
        } else {
            state.requests_this_minute = 0;
            state.minute_start = Instant::now();
        }

        state.requests_this_minute += 1;
    }

    pub async fn update_from_headers(&self, headers: &HeaderMap) {
        let Some(remaining) = header_u64(headers, "x-ratelimit-remaining") else {
            return;
        };

        let mut state = self.state.lock().await;
        state.remaining = Some(remaining as u32);
        state.reset_at = reset_in_secs(headers)
            .map(|secs| Instant::now() + Duration::from_secs(secs));
    }
}

/// Seconds until the quota window in `x-ratelimit-reset` reopens, or the
/// `retry-after` value for secondary limits.
pub fn reset_in_secs(headers: &HeaderMap) -> Option<u64> {
    if let Some(retry_after) = header_u64(headers, "retry-after") {
        return Some(retry_after);
    }
    let reset = header_u64(headers, "x-ratelimit-reset")?;
    let now = Utc::now().timestamp().max(0) as u64;
    Some(reset.saturating_sub(now))
}

pub fn quota_exhausted(headers: &HeaderMap) -> bool {
    header_u64(headers, "x-ratelimit-remaining") == Some(0) || headers.contains_key("retry-after")
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(SEARCH_REQUESTS_PER_MINUTE)
    }
}
