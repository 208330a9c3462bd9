//! Retry with exponential backoff for page fetches.
//!
//! Only transient conditions are retried; everything else is returned on the
//! first failure.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a server-requested `Retry-After` wait, so one header
/// cannot hold a scrape request open for minutes.
const MAX_RETRY_AFTER_SECS: u64 = 30;

/// Returns `true` if `err` is transient and worth another attempt.
///
/// Retriable: [`ScraperError::RateLimited`] (HTTP 429) and
/// [`ScraperError::Http`] (connection reset, timeout, TLS failure).
///
/// Not retriable: [`ScraperError::InvalidUrl`] and
/// [`ScraperError::Extraction`]; the same input gives the same answer.
fn is_retriable(err: &ScraperError) -> bool {
    matches!(
        err,
        ScraperError::RateLimited { .. } | ScraperError::Http(_)
    )
}

/// Seconds to sleep after the failure of attempt `attempt` (0-based).
///
/// Exponential backoff `backoff_base_secs * 2^attempt`. A 429 that carried a
/// `Retry-After` hint waits at least that long, capped at
/// [`MAX_RETRY_AFTER_SECS`].
fn retry_delay_secs(err: &ScraperError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let backoff = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        ScraperError::RateLimited {
            retry_after_secs: Some(hint),
            ..
        } => backoff.max((*hint).min(MAX_RETRY_AFTER_SECS)),
        _ => backoff,
    }
}

/// Executes `operation`, retrying retriable errors up to `max_retries` times.
///
/// With `max_retries = 2` and a base of 1 the operation runs at most three
/// times with 1 s and 2 s pauses, longer if a 429 asks for it (see
/// [`retry_delay_secs`]). The last error is returned once retries are
/// exhausted.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
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

        let delay_secs = retry_delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient page fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}
