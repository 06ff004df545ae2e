//! Polite-pool rate limiting for the bibliographic client.
//!
//! OpenAlex asks polite-pool callers to stay under ten requests per second. The
//! concurrent per-tier searches of one term would otherwise burst past that.

use std::num::NonZeroU32;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};

/// Shared request pacer. A rate of zero disables pacing.
#[derive(Debug)]
pub struct PoliteLimiter {
    inner: Option<DefaultDirectRateLimiter>,
}

impl PoliteLimiter {
    /// Create a limiter allowing `per_second` requests per second.
    #[must_use]
    pub fn new(per_second: u32) -> Self {
        let inner =
            NonZeroU32::new(per_second).map(|rate| RateLimiter::direct(Quota::per_second(rate)));
        Self { inner }
    }

    /// Whether pacing is active.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Wait until the next request may be sent.
    pub async fn until_ready(&self) {
        if let Some(limiter) = &self.inner {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_limiter_never_waits() {
        let limiter = PoliteLimiter::new(0);
        assert!(!limiter.is_enabled());
        for _ in 0..100 {
            limiter.until_ready().await;
        }
    }

    #[tokio::test]
    async fn test_enabled_limiter_admits_first_request() {
        let limiter = PoliteLimiter::new(10);
        assert!(limiter.is_enabled());
        limiter.until_ready().await;
    }
}
