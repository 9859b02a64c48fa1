//! Retry with exponential backoff for the search transport.
//!
//! The curation pipeline itself never retries: a failed query branch simply
//! contributes nothing. Retries here are an opt-in transport policy and are
//! disabled by default (`WARDROBE_SEARCH_MAX_RETRIES=0`).

use std::future::Future;
use std::time::Duration;

use crate::error::ShoppingError;

/// Upper bound on a server-requested `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 60;

/// Retriable errors:
/// - [`ShoppingError::RateLimited`]: HTTP 429.
/// - [`ShoppingError::Http`]: network-level failure.
///
/// Everything else (bad status, bad body, empty answer) is returned as-is.
fn is_retriable(err: &ShoppingError) -> bool {
    matches!(
        err,
        ShoppingError::RateLimited { .. } | ShoppingError::Http(_)
    )
}

/// Seconds to wait before retry number `attempt + 1`.
///
/// `backoff_base_secs * 2^attempt`, raised to the server's `Retry-After`
/// (capped at [`MAX_RETRY_AFTER_SECS`]) when the error is a 429.
fn delay_for(err: &ShoppingError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        ShoppingError::RateLimited { retry_after_secs } => {
            backoff.max((*retry_after_secs).min(MAX_RETRY_AFTER_SECS))
        }
        _ => backoff,
    }
}

/// Executes `operation`, retrying transient errors up to `max_retries`
/// additional times. With `max_retries = 0` the operation runs exactly once.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ShoppingError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ShoppingError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = delay_for(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient search error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
