//! Per-request bookkeeping

use tokio::time::{Duration, Instant};
use uuid::Uuid;

/// State carried by one logical request across all of its attempts.
///
/// Created before the first transmission and dropped once the request
/// settles; retransmissions reuse it so the request id and the retry window
/// stay fixed.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID (UUID v4), sent as `x-request-id`
    pub request_id: String,
    /// When the request was created
    pub start_time: Instant,
    /// Transient-failure retries taken so far
    pub retry_count: u32,
    /// Start of the window that bounds total retry time
    pub retry_window_start: Instant,
    /// Set once the 401 refresh path has been taken
    pub is_retry: bool,
}

impl RequestContext {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            request_id: Uuid::new_v4().to_string(),
            start_time: now,
            retry_count: 0,
            retry_window_start: now,
            is_retry: false,
        }
    }

    /// Elapsed time since this request was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_context_has_unique_id() {
        let ctx1 = RequestContext::new();
        let ctx2 = RequestContext::new();
        assert_ne!(ctx1.request_id, ctx2.request_id);
        assert!(Uuid::parse_str(&ctx1.request_id).is_ok());
    }

    #[test]
    fn test_request_context_starts_fresh() {
        let ctx = RequestContext::new();
        assert_eq!(ctx.retry_count, 0);
        assert!(!ctx.is_retry);
        assert_eq!(ctx.start_time, ctx.retry_window_start);
    }
}
