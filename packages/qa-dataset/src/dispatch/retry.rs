//! Bounded retry with exponential backoff and jitter.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::warn;

/// How many times to retry a failed call and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Default: 2 (three attempts in total).
    pub max_retries: u32,

    /// Delay after the first failure; doubles on each further failure.
    ///
    /// Default: 500ms.
    pub base_delay: Duration,

    /// Upper bound of the uniform random delay added to each backoff.
    ///
    /// Default: 300ms.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            jitter: Duration::from_millis(300),
        }
    }
}

/// Final result of a retried operation plus the number of attempts made.
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// No sleeping between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Exponential part of the delay after failed attempt `attempt` (1-based).
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1 << exponent)
    }

    /// Full delay after failed attempt `attempt`: backoff plus random jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff_for(attempt) + self.jitter.mul_f64(fastrand::f64())
    }

    /// Run `op` until it succeeds or attempts are exhausted.
    ///
    /// `op` receives the 1-based attempt number. There is no sleep after the
    /// final attempt.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.run_if(op, |_| true).await
    }

    /// Like [`RetryPolicy::run`], but stops at the first error `retryable`
    /// rejects.
    pub async fn run_if<T, E, F, Fut, P>(&self, mut op: F, retryable: P) -> RetryOutcome<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 0;

        loop {
            attempt += 1;

            match op(attempt).await {
                Ok(value) => {
                    return RetryOutcome {
                        result: Ok(value),
                        attempts: attempt,
                    }
                }
                Err(e) if attempt < self.max_attempts() && retryable(&e) => {
                    let delay = self.delay_for(attempt);
                    warn!(
                        error = %e,
                        attempt,
                        max_attempts = self.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        "Call failed, retrying..."
                    );
                    sleep(delay).await;
                }
                Err(e) => {
                    warn!(error = %e, attempts = attempt, "Call failed, giving up");
                    return RetryOutcome {
                        result: Err(e),
                        attempts: attempt,
                    };
                }
            }
        }
    }
}
