//! Login brute-force protection.
//!
//! Failures are counted per raw login identifier in process memory. Once an
//! identifier reaches the attempt limit, every attempt is refused until the
//! lockout window since its last failure has passed. The count itself only
//! resets on a successful login, so one more failure after the window locks
//! the identifier again.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::LoginThrottleConfig;

#[derive(Debug, Clone, Copy)]
struct AttemptRecord {
    count: u32,
    last_failure: DateTime<Utc>,
}

/// Per-identifier failure counter.
///
/// The key is the identifier exactly as typed, so a username and an email
/// belonging to the same account are counted separately.
#[derive(Debug)]
pub struct LoginThrottle {
    config: LoginThrottleConfig,
    attempts: Mutex<HashMap<String, AttemptRecord>>,
}

impl LoginThrottle {
    #[must_use]
    pub fn new(config: LoginThrottleConfig) -> Self {
        Self {
            config,
            attempts: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `identifier` may attempt a login at `now`.
    ///
    /// # Errors
    ///
    /// Returns the remaining lockout when the identifier is locked.
    pub fn check(&self, identifier: &str, now: DateTime<Utc>) -> Result<(), Duration> {
        let attempts = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(record) = attempts.get(identifier) else {
            return Ok(());
        };

        if record.count < self.config.max_attempts {
            return Ok(());
        }

        // A clock that moved backwards counts as no time elapsed.
        let elapsed = (now - record.last_failure)
            .to_std()
            .unwrap_or(Duration::ZERO);
        if elapsed < self.config.lockout {
            Err(self.config.lockout - elapsed)
        } else {
            Ok(())
        }
    }

    /// Count a failed attempt. Returns the new failure count.
    pub fn record_failure(&self, identifier: &str, now: DateTime<Utc>) -> u32 {
        let mut attempts = self.attempts.lock().unwrap_or_else(PoisonError::into_inner);
        let record = attempts
            .entry(identifier.to_owned())
            .or_insert(AttemptRecord {
                count: 0,
                last_failure: now,
            });
        record.count = record.count.saturating_add(1);
        record.last_failure = now;
        record.count
    }

    /// Forget all failures for `identifier`.
    pub fn clear(&self, identifier: &str) {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(identifier);
    }

    /// Current failure count for `identifier`.
    #[must_use]
    pub fn failures(&self, identifier: &str) -> u32 {
        self.attempts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(identifier)
            .map_or(0, |record| record.count)
    }
}
