//! Bounded retry for Moodle HTTP calls.
//!
//! Only transient transport errors (connection failures, timeouts) are
//! retried. Anything else, including HTTP error statuses, is returned as is.

use crate::config::RetryPolicy;
use rand::Rng;
use std::future::Future;
use std::time::Duration;

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout()
}

fn backoff(policy: &RetryPolicy) -> Duration {
    let low = policy.min_backoff_ms.min(policy.max_backoff_ms);
    let high = policy.max_backoff_ms.max(low);
    Duration::from_millis(rand::rng().random_range(low..=high))
}

/// Sends a request built by `f`, retrying up to `policy.max_retries` times on
/// transient failures with a randomized pause in between.
pub(crate) async fn retry_send<F, Fut>(
    policy: &RetryPolicy,
    f: F,
) -> Result<reqwest::Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<reqwest::Response, reqwest::Error>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < policy.max_retries && is_transient(&e) => {
                attempt += 1;
                let delay = backoff(policy);
                tracing::warn!(
                    attempt,
                    max_retries = policy.max_retries,
                    "Moodle request failed, retrying in {delay:?}: {e}"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
