//! Reconnect backoff
//!
//! Exponential backoff with full jitter: each failed attempt doubles the
//! window up to a cap, and the actual delay is drawn uniformly from
//! `[0, window]` so rejoining clients spread out.

use std::time::Duration;

use rand::Rng;

/// Exponential backoff schedule for reconnect attempts
#[derive(Debug)]
pub struct Backoff {
    base: Duration,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    /// Create a schedule from a base and a cap
    #[must_use]
    pub fn new(base: Duration, max: Duration) -> Self {
        Self {
            base,
            max,
            attempt: 0,
        }
    }

    /// Number of delays handed out since the last reset
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempt
    }

    /// Next delay in the schedule
    pub fn next_delay(&mut self) -> Duration {
        let exp = self.attempt.min(16); // 2^16 * base already dwarfs any sane cap
        let window = self
            .base
            .saturating_mul(1_u32 << exp)
            .min(self.max);
        self.attempt = self.attempt.saturating_add(1);

        let millis = window.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=millis))
    }

    /// Reset after a successful connection
    pub fn reset(&mut self) {
        self.attempt = 0;
    }
}
