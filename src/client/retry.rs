use std::future::Future;
use std::time::Duration;

use crate::config::RetryConfig;
use crate::error::Result;

/// Bounded retry around a single remote call. Only transient transport
/// failures are retried; validation and response errors surface immediately.
/// Attempts never run concurrently; the policy waits between attempts with an
/// exponential backoff capped at `max_backoff`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_backoff: Duration,
    multiplier: f64,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: config.initial_backoff,
            multiplier: config.multiplier,
            max_backoff: config.max_backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub async fn execute<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut backoff = self.initial_backoff;

        for attempt in 1..=self.max_attempts {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    log::warn!(
                        "{} failed on attempt {}/{}: {}; retrying in {:.1}s",
                        operation,
                        attempt,
                        self.max_attempts,
                        e,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                    backoff = backoff.mul_f64(self.multiplier).min(self.max_backoff);
                }
                Err(e) => return Err(e),
            }
        }

        unreachable!("retry loop always returns on the final attempt")
    }
}
