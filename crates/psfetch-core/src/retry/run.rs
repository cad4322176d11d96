//! Retry loop: run a closure until success or policy says stop.

use std::time::Duration;

use super::classify;
use super::error::{AttemptError, GaveUp};
use super::policy::{RetryDecision, RetryPolicy};

/// Blocks the thread of control between attempts.
pub trait Sleeper {
    fn sleep(&mut self, delay: Duration);
}

/// Real sleeper backed by `std::thread::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

/// Runs a closure until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// The closure receives the 1-based attempt number.
pub fn run_with_retry<T, S, F>(policy: &RetryPolicy, sleeper: &mut S, mut f: F) -> Result<T, GaveUp>
where
    S: Sleeper + ?Sized,
    F: FnMut(u32) -> Result<T, AttemptError>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt) {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        return Err(GaveUp {
                            last: e,
                            attempts: attempt,
                        })
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::warn!(
                            attempt,
                            max_attempts = policy.max_attempts,
                            delay_ms = d.as_millis() as u64,
                            "attempt failed: {}; retrying",
                            e
                        );
                        sleeper.sleep(d);
                        attempt += 1;
                    }
                }
            }
        }
    }
}
