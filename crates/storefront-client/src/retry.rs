//! Bounded linear backoff for transient failures

use crate::context::RequestContext;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry budget applied to network errors and 5xx responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Maximum retries after the first attempt
    pub max_retries: u32,
    /// No retry starts once this much time has passed since the first attempt
    pub window_ms: u64,
    /// Delay before the k-th retry is `k * backoff_step_ms`
    pub backoff_step_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            window_ms: 2_000,
            backoff_step_ms: 300,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before the given retry (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_step_ms.saturating_mul(u64::from(attempt)))
    }

    /// Claim the next retry for a request.
    ///
    /// Returns the delay to wait before retransmitting, or `None` once the
    /// retry cap or the time window is exhausted. Claiming increments the
    /// request's `retry_count`.
    pub fn next_delay(&self, ctx: &mut RequestContext) -> Option<Duration> {
        if ctx.retry_count >= self.max_retries {
            return None;
        }
        if ctx.retry_window_start.elapsed() >= Duration::from_millis(self.window_ms) {
            return None;
        }
        ctx.retry_count += 1;
        Some(self.backoff(ctx.retry_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[test]
    fn test_linear_backoff_schedule() {
        let policy = RetryPolicy::default();
        let mut ctx = RequestContext::new();

        assert_eq!(policy.next_delay(&mut ctx), Some(Duration::from_millis(300)));
        assert_eq!(policy.next_delay(&mut ctx), Some(Duration::from_millis(600)));
        assert_eq!(policy.next_delay(&mut ctx), None);
        assert_eq!(ctx.retry_count, 2);
    }

    #[test]
    fn test_window_ceiling_stops_retries_before_cap() {
        let policy = RetryPolicy::default();
        let mut ctx = RequestContext::new();
        ctx.retry_window_start = Instant::now()
            .checked_sub(Duration::from_millis(2_500))
            .expect("clock too close to boot");

        assert_eq!(policy.next_delay(&mut ctx), None);
        assert_eq!(ctx.retry_count, 0);
    }

    #[test]
    fn test_disabled_policy() {
        let mut ctx = RequestContext::new();
        assert_eq!(RetryPolicy::disabled().next_delay(&mut ctx), None);
    }

    #[test]
    fn test_backoff_is_deterministic() {
        let policy = RetryPolicy {
            max_retries: 5,
            window_ms: 60_000,
            backoff_step_ms: 100,
        };
        let delays: Vec<_> = (1..=5).map(|k| policy.backoff(k).as_millis()).collect();
        assert_eq!(delays, vec![100, 200, 300, 400, 500]);
    }
}
