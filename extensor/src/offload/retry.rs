//! Bounded retry loop with capped exponential backoff.

use std::future::Future;

use extensor_core::CallbackResult;
use tracing::{debug, info, warn};

use crate::metrics;
use crate::policy::RetryPolicy;

/// Final state of a [`retry`] loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryOutcome {
    /// An attempt succeeded.
    Succeeded {
        /// Attempts made, including the successful one.
        attempts: u32,
    },
    /// Every attempt failed.
    Exhausted {
        /// Attempts made.
        attempts: u32,
    },
}

/// Runs `op` up to `policy.attempts()` times, sleeping
/// [`policy.delay(i)`](RetryPolicy::delay) after failed attempt `i`.
///
/// `op` receives the zero-based attempt number. There is no sleep after the
/// last failure. Failures are logged at info level and giving up at warn level;
/// nothing is returned to the operation that scheduled the work.
pub async fn retry<F, Fut>(policy: &RetryPolicy, mut op: F) -> RetryOutcome
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = CallbackResult<()>>,
{
    let attempts = policy.attempts();
    for attempt in 0..attempts {
        metrics::record_write_back_attempt();
        match op(attempt).await {
            Ok(()) => {
                debug!(attempt = attempt + 1, "write-back succeeded");
                return RetryOutcome::Succeeded {
                    attempts: attempt + 1,
                };
            }
            Err(error) => {
                info!(attempt = attempt + 1, error = %error, "write-back attempt failed");
                if attempt + 1 < attempts {
                    tokio::time::sleep(policy.delay(attempt)).await;
                }
            }
        }
    }

    warn!(attempts, "write-back failed after {attempts} attempts, giving up");
    metrics::record_write_back_exhausted();
    RetryOutcome::Exhausted { attempts }
}
