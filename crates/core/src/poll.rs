// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deadline-bounded polling
//!
//! Waiting is all-or-nothing: once started, a wait either observes its
//! condition or raises a fatal timeout. There is no cooperative
//! cancellation.

use crate::clock::Clock;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors from polling
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("timed out after {timeout:?} waiting for {what}")]
    Timeout { what: String, timeout: Duration },
}

/// Poll cadence and deadline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            interval: Duration::from_secs(5),
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

/// A running countdown against a clock
#[derive(Clone)]
pub struct Deadline<C: Clock> {
    clock: C,
    start: Instant,
    timeout: Duration,
}

impl<C: Clock> Deadline<C> {
    pub fn new(clock: C, timeout: Duration) -> Self {
        let start = clock.now();
        Self {
            clock,
            start,
            timeout,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.now() - self.start
    }

    pub fn remaining(&self) -> Duration {
        self.timeout.saturating_sub(self.elapsed())
    }

    pub fn expired(&self) -> bool {
        self.elapsed() > self.timeout
    }

    /// Raise a fatal timeout once the deadline has passed
    pub fn check(&self, what: &str) -> Result<(), WaitError> {
        if self.expired() {
            tracing::error!(what, timeout = ?self.timeout, "deadline exceeded");
            return Err(WaitError::Timeout {
                what: what.to_string(),
                timeout: self.timeout,
            });
        }
        Ok(())
    }
}

impl<C: Clock> fmt::Debug for Deadline<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deadline")
            .field("timeout", &self.timeout)
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

/// Poll `condition` at the configured interval until it holds or the
/// deadline passes
pub fn wait_until<C: Clock>(
    clock: &C,
    poll: &PollConfig,
    what: &str,
    mut condition: impl FnMut() -> bool,
) -> Result<(), WaitError> {
    if condition() {
        return Ok(());
    }

    let deadline = Deadline::new(clock.clone(), poll.timeout);
    loop {
        deadline.check(what)?;
        tracing::debug!(what, "waiting");
        clock.sleep(poll.interval);
        if condition() {
            return Ok(());
        }
    }
}

/// Wait for a file to exist
pub fn wait_for_path<C: Clock>(clock: &C, poll: &PollConfig, path: &Path) -> Result<(), WaitError> {
    let what = format!("{} to exist", path.display());
    wait_until(clock, poll, &what, || path.exists())
}

/// Run a fallible operation until it succeeds, sleeping a jittered backoff
/// between attempts, with a fatal timeout on the deadline
pub fn retry_until<C: Clock, T, E: fmt::Display>(
    clock: &C,
    policy: &RetryPolicy,
    timeout: Duration,
    what: &str,
    mut op: impl FnMut() -> Result<T, E>,
) -> Result<T, WaitError> {
    let deadline = Deadline::new(clock.clone(), timeout);
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => tracing::warn!(what, error = %e, "attempt failed"),
        }
        clock.sleep(policy.backoff());
        deadline.check(what)?;
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
