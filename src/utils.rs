use std::future::Future;

use tokio::time::{Duration, sleep};
use tracing::{debug, info, warn};

use crate::models::retry::RetryConfig;

/// Exponential delay schedule, capped at `max_delay_ms`.
#[derive(Debug, Clone)]
pub struct Backoff {
    next_delay_ms: u64,
    max_delay_ms: u64,
    multiplier: u64,
}

impl Backoff {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            next_delay_ms: config.initial_delay_ms.min(config.max_delay_ms),
            max_delay_ms: config.max_delay_ms,
            multiplier: config.backoff_multiplier,
        }
    }

    /// Base delay before jitter, advancing the schedule.
    pub fn next_base_delay_ms(&mut self) -> u64 {
        let current = self.next_delay_ms;
        self.next_delay_ms = current
            .saturating_mul(self.multiplier)
            .min(self.max_delay_ms);
        current
    }

    /// Next delay with up to 10% jitter either way.
    pub fn next_delay(&mut self) -> Duration {
        let base = self.next_base_delay_ms() as f64;
        let factor: f64 = rand::random_range(0.9..=1.1);
        Duration::from_millis((base * factor) as u64)
    }
}

/// Runs `operation` up to `max_attempts` times, sleeping on the [`Backoff`]
/// schedule between failures. Returns the last error once attempts run out.
pub async fn retry_with_backoff<F, Fut, T, E>(config: &RetryConfig, operation: F) -> Result<T, E>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut backoff = Backoff::new(config);
    let mut attempt: u32 = 1;

    loop {
        let error = match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    info!(attempt, "Operation recovered after retry");
                }
                return Ok(value);
            }
            Err(error) => error,
        };

        if attempt >= config.max_attempts {
            warn!(attempts = attempt, error = %error, "Giving up after final attempt");
            return Err(error);
        }

        let delay = backoff.next_delay();
        debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Attempt failed, retrying"
        );

        sleep(delay).await;
        attempt += 1;
    }
}
