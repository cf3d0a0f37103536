//! Retry with exponential backoff and jitter
//!
//! Wraps an arbitrary fallible async operation. Delays grow as
//! `base * 2^attempt`, scaled by a random 50-100% jitter multiplier so
//! concurrent retries do not synchronize. This layer does not log;
//! callers decide what a failure means.

use rand::Rng;
use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `max_attempts` times.
///
/// After a failed attempt `i` (0-indexed, with `i < max_attempts - 1`)
/// sleeps for `base_delay * 2^i * (0.5 + U(0,1) * 0.5)`, capped at
/// [`MAX_BACKOFF`], before the next attempt. On exhaustion the last
/// observed error is returned.
pub async fn retry<T, E, F, Fut>(max_attempts: u32, base_delay: Duration, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= max_attempts.max(1) {
                    return Err(e);
                }
                tokio::time::sleep(backoff_delay(base_delay, attempt - 1)).await;
            }
        }
    }
}

/// Upper bound on a single backoff sleep, whatever the attempt count.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Jittered exponential delay for the given 0-indexed attempt,
/// capped at [`MAX_BACKOFF`].
fn backoff_delay(base_delay: Duration, attempt: u32) -> Duration {
    // Exponent is clamped before the cap so the f64 math stays finite
    // for any attempt count.
    let exponent = attempt.min(16);
    let exponential = base_delay.as_secs_f64() * 2f64.powi(exponent as i32);
    let jitter = 0.5 + rand::thread_rng().gen::<f64>() * 0.5;
    Duration::from_secs_f64(exponential * jitter).min(MAX_BACKOFF)
}
