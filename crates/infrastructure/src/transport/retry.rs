//! Retry wrapper around any [`HttpTransport`].
//!
//! Retries connection failures, HTTP 429 and 5xx (except 501) with
//! exponential backoff. A `Retry-After` header in seconds overrides the
//! computed delay. Requests whose body cannot be cloned are sent once.

use super::HttpTransport;
use async_trait::async_trait;
use ferrous_doh_domain::DomainError;
use reqwest::header::RETRY_AFTER;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub retry_max: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
}

impl RetryPolicy {
    pub fn new(retry_max: u32) -> Self {
        Self {
            retry_max,
            ..Self::default()
        }
    }

    /// `min_backoff * 2^attempt`, capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        if let Some(wait) = retry_after {
            return wait.min(self.max_backoff);
        }
        let factor = 2u32.saturating_pow(attempt);
        self.min_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    pub fn should_retry_status(status: StatusCode) -> bool {
        status == StatusCode::TOO_MANY_REQUESTS
            || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_max: 10,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

pub struct RetryTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> RetryTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    fn retry_after(response: &reqwest::Response) -> Option<Duration> {
        response
            .headers()
            .get(RETRY_AFTER)?
            .to_str()
            .ok()?
            .trim()
            .parse::<u64>()
            .ok()
            .map(Duration::from_secs)
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for RetryTransport<T> {
    async fn execute(&self, request: reqwest::Request) -> Result<reqwest::Response, DomainError> {
        let mut attempt = 0u32;
        let mut pending = request;

        loop {
            let next = if attempt < self.policy.retry_max {
                pending.try_clone()
            } else {
                None
            };
            let url = pending.url().clone();
            let result = self.inner.execute(pending).await;

            let Some(next) = next else {
                return result;
            };

            let wait = match &result {
                Ok(response) if !RetryPolicy::should_retry_status(response.status()) => {
                    return result;
                }
                Ok(response) => {
                    debug!(url = %url, status = response.status().as_u16(), attempt = attempt, "Retryable HTTP status");
                    self.policy.backoff(attempt, Self::retry_after(response))
                }
                Err(e) if e.is_cancelled() => return result,
                Err(e) => {
                    warn!(url = %url, error = %e, attempt = attempt, "Request failed, retrying");
                    self.policy.backoff(attempt, None)
                }
            };

            tokio::time::sleep(wait).await;
            attempt += 1;
            pending = next;
        }
    }
}
