// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic exclusive file creation
//!
//! The single cross-process synchronization primitive in the kernel. All
//! mutual exclusion reduces to `OpenOptions::create_new`, which the OS
//! guarantees to succeed for exactly one caller per path. Contention is a
//! normal outcome, not an error, so the result is a three-way split:
//! created / already exists / I/O failure.

use crate::clock::Clock;
use crate::retry::RetryPolicy;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Outcome of an exclusive-create attempt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// This caller created the file and owns the claim
    Created,
    /// Another process holds the path; ordinary contention
    AlreadyExists,
}

/// Errors from the claimer after its retry budget is spent
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Claims paths via atomic exclusive create, retrying transient I/O errors
#[derive(Clone, Debug)]
pub struct FileClaimer<C: Clock> {
    retry: RetryPolicy,
    clock: C,
}

impl<C: Clock> FileClaimer<C> {
    pub fn new(retry: RetryPolicy, clock: C) -> Self {
        Self { retry, clock }
    }

    /// Attempt to create `path`, failing if it already exists.
    ///
    /// `AlreadyExists` is returned as a success value: the caller lost a
    /// race, nothing went wrong. Unexpected I/O errors are retried after a
    /// jittered backoff until the policy's attempt budget is spent, then
    /// propagated with the attempted path.
    pub fn try_create(&self, path: &Path) -> Result<ClaimOutcome, ClaimError> {
        let mut attempt = 1;
        loop {
            match create_exclusive(path) {
                Ok(()) => {
                    tracing::debug!(path = %path.display(), "created");
                    return Ok(ClaimOutcome::Created);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::trace!(path = %path.display(), "already exists");
                    return Ok(ClaimOutcome::AlreadyExists);
                }
                Err(e) if attempt < self.retry.max_attempts => {
                    let backoff = self.retry.backoff();
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        backoff_ms = backoff.as_millis() as u64,
                        "create failed, retrying"
                    );
                    self.clock.sleep(backoff);
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "create failed");
                    return Err(ClaimError::Io {
                        path: path.to_path_buf(),
                        source: e,
                    });
                }
            }
        }
    }
}

fn create_exclusive(path: &Path) -> io::Result<()> {
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map(|_| ())
}

#[cfg(test)]
#[path = "claim_tests.rs"]
mod tests;
