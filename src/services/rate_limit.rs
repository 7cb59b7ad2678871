// src/services/rate_limit.rs
// DOCUMENTATION: Per-email throttling of OTP emails
// PURPOSE: Bound how often one address can trigger a mail send

use crate::errors::ApiError;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

pub struct OtpRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl OtpRateLimiter {
    /// `per_minute` sends per address; zero is treated as one
    pub fn new(per_minute: u32) -> Self {
        let burst = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(burst)),
        }
    }

    /// Consume one send for `email`, or fail with 429
    pub fn check(&self, email: &str) -> Result<(), ApiError> {
        let key = email.trim().to_ascii_lowercase();
        self.limiter.check_key(&key).map_err(|_| {
            log::warn!("OTP rate limit exceeded for {}", key);
            ApiError::RateLimitExceeded
        })
    }

    /// Drop state for keys that are back at full capacity
    pub fn cleanup(&self) {
        self.limiter.retain_recent();
    }
}
