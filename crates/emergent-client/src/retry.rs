//! The two-phase retry wrapper every backend operation runs through.
//!
//! Phase 1 (`k < threshold`) backs off exponentially, capped at 60s; phase 2
//! (`k >= threshold`) switches to a fixed long-outage interval, logged once
//! at the boundary. `max_retries = -1` means infinite; `0` means the first
//! failure surfaces immediately. Grounded on `shipper-retry`'s
//! `calculate_delay`-style pure backoff function, specialized to this
//! spec's two-phase policy rather than shipper's four interchangeable
//! strategies, and widened to `i64` so `-1` (infinite) is representable.

use crate::error::ClientError;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Tunables for the retry wrapper, sourced from `emergent.*` config.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// `-1` = infinite, `0` = no retry, otherwise a hard cap on extra attempts.
    pub max_retries: i64,
    /// `b0` in the exponential backoff formula `min(2^k * b0, 60s)`.
    pub base_delay: Duration,
    /// The 60s cap on phase-1 backoff.
    pub phase1_cap: Duration,
    /// Consecutive-failure count at which phase 2 (fixed interval) begins.
    pub long_outage_threshold: u32,
    /// The fixed sleep used once phase 2 begins.
    pub long_outage_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: -1,
            base_delay: Duration::from_millis(500),
            phase1_cap: Duration::from_secs(60),
            long_outage_threshold: 20,
            long_outage_interval: Duration::from_secs(5 * 60),
        }
    }
}

impl RetryPolicy {
    /// The backoff to sleep after `k` consecutive failures (0-indexed).
    fn delay_for(&self, k: u32) -> Duration {
        if k < self.long_outage_threshold {
            let pow = k.min(20);
            self.base_delay
                .saturating_mul(1u32.checked_shl(pow).unwrap_or(u32::MAX))
                .min(self.phase1_cap)
        } else {
            self.long_outage_interval
        }
    }
}

/// Runs `f` until it succeeds, exhausts `policy.max_retries`, hits a
/// non-retryable error, or is cancelled via `cancellation`.
///
/// `operation` is a label used only for logging (e.g. `"create_object"`).
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    cancellation: &CancellationToken,
    operation: &str,
    mut f: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut consecutive_failures: u32 = 0;
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match f().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(operation, attempts = attempt, "operation succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) => {
                if !err.is_retryable() {
                    return Err(err);
                }

                let retries_so_far = (attempt - 1) as i64;
                if policy.max_retries >= 0 && retries_so_far >= policy.max_retries {
                    return Err(err);
                }

                if consecutive_failures == policy.long_outage_threshold {
                    warn!(operation, "switching to long outage mode");
                }

                let delay = policy.delay_for(consecutive_failures);
                warn!(
                    operation,
                    attempt,
                    error = %err,
                    delay_ms = delay.as_millis() as u64,
                    "retrying operation after error"
                );

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = cancellation.cancelled() => {
                        return Err(ClientError::Cancelled);
                    }
                }

                consecutive_failures += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn max_retries_zero_surfaces_first_failure_immediately() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..Default::default()
        };
        let cancellation = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), ClientError> = with_retry(&policy, &cancellation, "op", || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::Transient("down".into()))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retries_until_success_and_resets() {
        let policy = RetryPolicy {
            max_retries: -1,
            base_delay: Duration::from_millis(1),
            ..Default::default()
        };
        let cancellation = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<&'static str, ClientError> =
            with_retry(&policy, &cancellation, "op", || {
                let calls = calls.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 3 {
                        Err(ClientError::Transient("down".into()))
                    } else {
                        Ok("ok")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn non_retryable_errors_abort_immediately() {
        let policy = RetryPolicy::default();
        let cancellation = CancellationToken::new();
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), ClientError> = with_retry(&policy, &cancellation, "op", || {
            let calls = calls.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ClientError::NotFound("x".into()))
            }
        })
        .await;

        assert!(matches!(result, Err(ClientError::NotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_aborts_during_backoff_sleep() {
        let policy = RetryPolicy {
            base_delay: Duration::from_secs(10),
            ..Default::default()
        };
        let cancellation = CancellationToken::new();
        cancellation.cancel();

        let result: Result<(), ClientError> = with_retry(&policy, &cancellation, "op", || async {
            Err(ClientError::Transient("down".into()))
        })
        .await;

        assert!(matches!(result, Err(ClientError::Cancelled)));
    }

    #[test]
    fn phase_two_uses_fixed_interval_past_threshold() {
        let policy = RetryPolicy {
            long_outage_threshold: 5,
            long_outage_interval: Duration::from_secs(60),
            ..Default::default()
        };
        assert!(policy.delay_for(4) < policy.delay_for(5));
        assert_eq!(policy.delay_for(5), Duration::from_secs(60));
        assert_eq!(policy.delay_for(10), Duration::from_secs(60));
    }

    #[test]
    fn phase_one_backoff_is_exponential_and_capped() {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(500),
            phase1_cap: Duration::from_secs(60),
            long_outage_threshold: 20,
            ..Default::default()
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(7), Duration::from_secs(60));
    }
}
