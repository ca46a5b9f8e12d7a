use std::num::NonZeroU32;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tracing::debug;

/// Gate in front of each model call. `index` is the call's position in its
/// batch, starting at zero.
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn before_call(&self, index: usize);
}

/// Sleep a fixed interval between calls. The first call goes out at once.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

#[async_trait]
impl Pacer for FixedDelay {
    async fn before_call(&self, index: usize) {
        if index > 0 && !self.0.is_zero() {
            debug!(delay_ms = self.0.as_millis() as u64, "Pacing");
            tokio::time::sleep(self.0).await;
        }
    }
}

/// Requests-per-minute quota, one token per call with no burst.
///
/// Every call takes a token, the first included, so at most `n` calls start
/// within any minute.
pub struct RateLimitedPacer {
    limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
}

impl RateLimitedPacer {
    pub fn per_minute(requests: NonZeroU32) -> Self {
        let quota = Quota::per_minute(requests).allow_burst(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::direct(quota),
        }
    }
}

#[async_trait]
impl Pacer for RateLimitedPacer {
    async fn before_call(&self, _index: usize) {
        self.limiter.until_ready().await;
    }
}
