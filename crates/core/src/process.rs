// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process tracker: per-process state machine
//!
//! ```text
//! Running --(mark failed)--> Failed    [terminal]
//! Running --(mark finished)--> Finished [terminal]
//! ```
//!
//! Pure in-memory bookkeeping; the coordinator drives the matching
//! filesystem transitions.

use crate::status::{InvalidStatus, ProcessStatus};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Errors from process tracking
#[derive(Debug, Error)]
pub enum TrackError {
    #[error("process {0:?} is already tracked")]
    DuplicateProcess(String),
    #[error("unknown process: {0:?}")]
    UnknownProcess(String),
    #[error("process {name:?} is already {current}, cannot become {requested}")]
    TerminalStatus {
        name: String,
        current: ProcessStatus,
        requested: ProcessStatus,
    },
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatus),
}

/// A tracked logical process
#[derive(Clone, Debug, Serialize)]
pub struct TrackedProcess {
    pub name: String,
    /// Logical directory name: `p<ordinal>_<name>`
    pub dir: String,
    pub status: ProcessStatus,
}

/// Tracks logical processes within one kernel instance
#[derive(Clone, Debug, Default)]
pub struct ProcessTracker {
    processes: HashMap<String, TrackedProcess>,
}

impl ProcessTracker {
    pub fn new() -> Self {
        Self {
            processes: HashMap::new(),
        }
    }

    /// Register a new process in the Running state.
    ///
    /// The ordinal is the current tracked count, giving each process a
    /// stable collision-free directory name.
    pub fn track(&mut self, name: &str) -> Result<&TrackedProcess, TrackError> {
        if self.processes.contains_key(name) {
            return Err(TrackError::DuplicateProcess(name.to_string()));
        }

        let dir = format!("p{}_{}", self.processes.len(), name);
        tracing::info!(process = name, dir, "tracking process");

        Ok(self
            .processes
            .entry(name.to_string())
            .or_insert(TrackedProcess {
                name: name.to_string(),
                dir,
                status: ProcessStatus::Running,
            }))
    }

    /// Update a process's status.
    ///
    /// Returns whether anything changed: re-setting the current status is a
    /// no-op, leaving a terminal status is an error.
    pub fn set_status(&mut self, name: &str, status: ProcessStatus) -> Result<bool, TrackError> {
        let process = self
            .processes
            .get_mut(name)
            .ok_or_else(|| TrackError::UnknownProcess(name.to_string()))?;

        if process.status == status {
            tracing::debug!(process = name, status = %status, "status unchanged");
            return Ok(false);
        }
        if process.status.is_terminal() {
            return Err(TrackError::TerminalStatus {
                name: name.to_string(),
                current: process.status,
                requested: status,
            });
        }

        process.status = status;
        tracing::info!(process = name, status = %status, "status updated");
        Ok(true)
    }

    pub fn get(&self, name: &str) -> Result<&TrackedProcess, TrackError> {
        self.processes
            .get(name)
            .ok_or_else(|| TrackError::UnknownProcess(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.processes.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedProcess> {
        self.processes.values()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
