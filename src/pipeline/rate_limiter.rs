use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Clone, Debug, Default)]
pub struct Limits {
    pub requests_per_min: Option<u64>,
}

/// Token bucket over lookup requests. With no limit configured, `acquire` returns immediately.
#[derive(Clone, Debug)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    limits: Limits,
    // tokens available and the instant they were last refilled
    bucket: Mutex<(f64, Instant)>,
}

impl RateLimiter {
    pub fn new(limits: Limits) -> Self {
        let capacity = limits.requests_per_min.unwrap_or(0) as f64;
        Self {
            inner: Arc::new(Inner {
                limits,
                bucket: Mutex::new((capacity, Instant::now())),
            }),
        }
    }

    /// Waits until one request may be sent.
    pub async fn acquire(&self) {
        if let Some(rpm) = self.inner.limits.requests_per_min {
            if rpm > 0 {
                self.consume(rpm as f64, 60.0).await;
            }
        }
    }

    async fn consume(&self, capacity: f64, period_secs: f64) {
        let refill_rate = capacity / period_secs;
        loop {
            let mut guard = self.inner.bucket.lock().await;
            let (ref mut tokens, ref mut last) = *guard;
            let now = Instant::now();
            let elapsed = now.duration_since(*last).as_secs_f64();
            *tokens = (*tokens + elapsed * refill_rate).min(capacity);
            *last = now;
            if *tokens >= 1.0 {
                *tokens -= 1.0;
                return;
            }
            let wait = (1.0 - *tokens) / refill_rate;
            drop(guard);
            tokio::time::sleep(Duration::from_secs_f64(wait.max(0.001))).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = RateLimiter::new(Limits::default());
        let start = Instant::now();
        for _ in 0..1000 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_once_bucket_is_empty() {
        let limiter = RateLimiter::new(Limits { requests_per_min: Some(2) });
        limiter.acquire().await;
        limiter.acquire().await;

        let before = Instant::now();
        limiter.acquire().await;
        // One token refills every 30 seconds at 2 rpm
        assert!(before.elapsed() >= Duration::from_secs(29));
    }
}
