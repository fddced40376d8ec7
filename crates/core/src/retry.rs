// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retry policy with jittered backoff
//!
//! One policy object is shared by the file claimer and the polling
//! utilities so retry and timeout semantics stay centrally testable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy: attempt budget plus a jittered backoff range
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first
    pub max_attempts: u32,
    /// Lower bound of the backoff range (inclusive)
    #[serde(with = "humantime_serde")]
    pub backoff_min: Duration,
    /// Upper bound of the backoff range (exclusive)
    #[serde(with = "humantime_serde")]
    pub backoff_max: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            backoff_min: Duration::from_millis(10),
            backoff_max: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_backoff(mut self, min: Duration, max: Duration) -> Self {
        self.backoff_min = min;
        self.backoff_max = max;
        self
    }

    /// Draw a jittered backoff duration from `[backoff_min, backoff_max)`
    pub fn backoff(&self) -> Duration {
        if self.backoff_max <= self.backoff_min {
            return self.backoff_min;
        }
        let span = (self.backoff_max - self.backoff_min).as_nanos() as u64;
        self.backoff_min + Duration::from_nanos(fastrand::u64(0..span))
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
