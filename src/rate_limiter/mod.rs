use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Keeps a minimum interval between consecutive requests
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Option<Instant>,
    request_count: usize,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            min_interval: Duration::from_millis(delay_ms),
            last_request: None,
            request_count: 0,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(remaining) = self.remaining_delay() {
            sleep(remaining).await;
        }
        self.last_request = Some(Instant::now());
        self.request_count += 1;
    }

    pub fn request_count(&self) -> usize {
        self.request_count
    }

    /// Time still to wait, if any, before the next request may go out
    fn remaining_delay(&self) -> Option<Duration> {
        let elapsed = self.last_request?.elapsed();
        self.min_interval
            .checked_sub(elapsed)
            .filter(|remaining| !remaining.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_request_does_not_wait() {
        let mut limiter = RateLimiter::new(10_000);
        let started = Instant::now();

        limiter.wait().await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.request_count(), 1);
    }

    #[tokio::test]
    async fn test_consecutive_requests_are_spaced() {
        let mut limiter = RateLimiter::new(30);
        let started = Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        assert!(started.elapsed() >= Duration::from_millis(60));
        assert_eq!(limiter.request_count(), 3);
    }
}
