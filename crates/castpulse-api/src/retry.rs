//! Bounded exponential-backoff retry for remote calls.

use std::future::Future;
use std::time::Duration;

use castpulse_core::error::{ApiError, ApiResult};

/// Default attempt budget for remote calls.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Run `op` up to `max_retries` times.
///
/// Retryable failures (timeout/connection) wait `2^attempt` seconds before
/// the next attempt — 2s, 4s, 8s for attempts 1, 2, 3 — with no wait after
/// the final one. Exhausting the budget yields `ApiError::Exhausted`.
/// Non-retryable failures propagate immediately, uncounted.
pub async fn retry_call<T, F, Fut>(label: &str, max_retries: u32, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    for attempt in 1..=max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() => {
                let wait_secs = 2u64.pow(attempt);
                tracing::warn!(
                    "{label} failed, retrying in {wait_secs}s (attempt {attempt}/{max_retries}): {e}"
                );
                if attempt < max_retries {
                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                } else {
                    tracing::error!("{label} failed after {max_retries} attempts: {e}");
                }
            }
            Err(e) => return Err(e),
        }
    }
    Err(ApiError::Exhausted {
        attempts: max_retries,
    })
}
