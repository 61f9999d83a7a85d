use std::future::Future;
use std::time::Duration;

use tracing::warn;

/// Fixed exponential backoff schedule: `initial_delay`, doubling after every
/// failed attempt, for at most `max_attempts` attempts in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_delay: Duration,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            max_attempts: 5,
        }
    }
}

impl RetryPolicy {
    /// Delay to wait before `attempt` (0-based). The first attempt never waits.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
        self.initial_delay.saturating_mul(factor)
    }

    /// Runs `op` until it succeeds or the attempts are exhausted, returning the
    /// last error in the latter case.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 >= attempts => return Err(e),
                Err(e) => {
                    attempt += 1;
                    let delay = self.delay_before(attempt);
                    warn!(
                        "{label} attempt {attempt}/{attempts} failed: {e}. Retrying in {}ms...",
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

impl RetryPolicy {
    /// Repeats [`RetryPolicy::run`] rounds until `op` succeeds, pausing for
    /// the last backoff delay between rounds.
    pub async fn run_until_ok<T, E, F, Fut>(&self, label: &str, mut op: F) -> T
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        let pause = self.delay_before(self.max_attempts.max(1));
        let mut round = 1u32;
        loop {
            match self.run(label, &mut op).await {
                Ok(value) => return value,
                Err(e) => {
                    warn!(round, "{label} still failing: {e}. Next round in {}ms", pause.as_millis());
                    tokio::time::sleep(pause).await;
                    round += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_schedule_doubles_from_initial_delay() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (0..5).map(|a| policy.delay_before(a).as_secs()).collect();
        assert_eq!(delays, vec![0, 2, 4, 8, 16]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, String> = RetryPolicy::default()
            .run("connect", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(format!("refused #{n}"))
                } else {
                    Ok(n)
                }
            })
            .await;
        assert_eq!(result, Ok(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(10),
            max_attempts: 3,
        };
        let result: Result<(), String> = policy
            .run("connect", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err("down".to_string())
            })
            .await;
        assert_eq!(result, Err("down".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_ok_outlasts_attempt_budget() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            initial_delay: Duration::from_millis(10),
            max_attempts: 3,
        };
        let value = policy
            .run_until_ok("connect", || async {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                if n < 7 {
                    Err(format!("refused #{n}"))
                } else {
                    Ok(n)
                }
            })
            .await;
        assert_eq!(value, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 8);
    }
}
