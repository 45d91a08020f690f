//! Bounded retry policy shared by both API clients
//!
//! Each call site classifies a response into an [`Attempt`]; the policy decides
//! whether to wait and try again.
//!
//! | Attempt | Action |
//! |---------|--------|
//! | `Done` | Return the value |
//! | `Wait(d)` | Sleep `d`, retry; not counted against the budget (rate limits) |
//! | `Retry(e)` | Count a failure; sleep the fixed delay and retry, or return `e` once the budget is spent |
//! | `Fail(e)` | Return `e` immediately |

use std::future::Future;
use std::time::Duration;

/// Classification of a single request attempt
#[derive(Debug)]
pub enum Attempt<T, E> {
    /// The request succeeded
    Done(T),
    /// Rate limited: wait this long and try again without spending budget
    Wait(Duration),
    /// Transient failure that spends one unit of budget
    Retry(E),
    /// Permanent failure
    Fail(E),
}

/// Attempt budget and fixed backoff for transient failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of transient failures tolerated before giving up
    pub max_attempts: u32,

    /// Pause between transient failures
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Returns true if another attempt is allowed after `failures` transient failures
    pub fn allows_retry(&self, failures: u32) -> bool {
        failures < self.max_attempts
    }

    /// Runs `attempt` until it succeeds, fails permanently, or exhausts the budget
    ///
    /// `label` only feeds the log lines.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut attempt: F) -> Result<T, E>
    where
        E: std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Attempt<T, E>>,
    {
        let mut failures = 0u32;

        loop {
            match attempt().await {
                Attempt::Done(value) => return Ok(value),
                Attempt::Wait(wait) => {
                    tracing::warn!("{}: rate limited, sleeping {:?}", label, wait);
                    tokio::time::sleep(wait).await;
                }
                Attempt::Retry(err) => {
                    failures += 1;
                    if !self.allows_retry(failures) {
                        tracing::warn!("{}: giving up after {} attempts: {}", label, failures, err);
                        return Err(err);
                    }
                    tracing::warn!(
                        "{}: attempt {}/{} failed: {}, retrying in {:?}",
                        label,
                        failures,
                        self.max_attempts,
                        err,
                        self.delay
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Attempt::Fail(err) => return Err(err),
            }
        }
    }
}
