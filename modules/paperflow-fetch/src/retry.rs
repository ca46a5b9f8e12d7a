use std::time::Duration;

/// Bounded retry with exponential backoff.
///
/// Attempt `i` (zero-based) that fails is followed by a wait of
/// `backoff_factor ^ i` seconds: 1s, 2s, 4s for the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_factor: f64) -> Self {
        Self {
            max_retries: max_retries.max(1),
            backoff_factor,
        }
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        Duration::from_secs_f64(self.backoff_factor.powi(exponent))
    }
}
