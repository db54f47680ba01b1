// src/services/rate_limit.rs
//! Fixed-window rate limiting for code issuance.
//!
//! Each identity gets [`MAX_ATTEMPTS_PER_WINDOW`] code requests per
//! [`WINDOW_MINUTES`]-minute window. The first attempt opens the window;
//! once it closes, the next attempt opens a fresh one. State lives in
//! process memory, so a restart clears all counters; acceptable for an
//! abuse brake, as the credentials themselves carry their own expiry.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Maximum code requests per identity per window.
pub const MAX_ATTEMPTS_PER_WINDOW: u32 = 3;

/// Window length in minutes.
pub const WINDOW_MINUTES: i64 = 15;

/// Per-identity attempt counter.
#[derive(Debug, Clone)]
struct AttemptRecord {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// Attempt accepted and counted.
    Allowed,
    /// Attempt rejected; the caller should retry after the given number of
    /// minutes (rounded up, minimum 1).
    Limited { retry_after_minutes: i64 },
}

/// In-memory fixed-window rate limiter keyed by normalized identity.
pub struct RateLimiter {
    attempts: Mutex<HashMap<String, AttemptRecord>>,
}

impl RateLimiter {
    /// Creates a new RateLimiter with no recorded attempts.
    pub fn new() -> Self {
        RateLimiter {
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Records an attempt for `identity` and decides whether it is allowed.
    ///
    /// # Arguments
    /// * `identity` - Normalized identity (lowercased e-mail address)
    ///
    /// # Returns
    /// `RateLimitDecision::Allowed` when the attempt fits in the current
    /// window, otherwise `Limited` with the minutes remaining until the
    /// window closes.
    pub fn check_and_increment(&self, identity: &str) -> RateLimitDecision {
        self.check_and_increment_at(identity, Utc::now())
    }

    /// Clock-injected variant of [`check_and_increment`](Self::check_and_increment).
    pub fn check_and_increment_at(
        &self,
        identity: &str,
        now: DateTime<Utc>,
    ) -> RateLimitDecision {
        let mut attempts = self.attempts.lock().unwrap();

        if let Some(record) = attempts.get_mut(identity) {
            if now < record.reset_at {
                if record.count >= MAX_ATTEMPTS_PER_WINDOW {
                    let remaining = record.reset_at - now;
                    // Round up so "30 seconds left" reads as "1 minute".
                    let minutes = (remaining.num_seconds() + 59) / 60;
                    return RateLimitDecision::Limited {
                        retry_after_minutes: minutes.max(1),
                    };
                }
                record.count += 1;
                return RateLimitDecision::Allowed;
            }
        }

        // No record, or the previous window has closed: start fresh.
        attempts.insert(
            identity.to_string(),
            AttemptRecord {
                count: 1,
                reset_at: now + Duration::minutes(WINDOW_MINUTES),
            },
        );
        RateLimitDecision::Allowed
    }

    /// Clears all recorded attempts.
    pub fn reset(&self) {
        self.attempts.lock().unwrap().clear();
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
