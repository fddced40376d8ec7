// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process status and the status-to-suffix mapping
//!
//! File suffixes are the wire format: `<logical>.<suffix>` encodes a file's
//! lifecycle state on disk, and the candidate order
//! [running, failed, finished] is semantically meaningful. The mapping is
//! explicit and validated at construction rather than positional.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle status of a tracked process
///
/// Running is the only legal start state; Failed and Finished are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Running,
    Failed,
    Finished,
}

impl ProcessStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProcessStatus::Running)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Running => "running",
            ProcessStatus::Failed => "failed",
            ProcessStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection of a status string at the parse boundary
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid status {0:?} (expected running, failed, or finished)")]
pub struct InvalidStatus(pub String);

impl FromStr for ProcessStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ProcessStatus::Running),
            "failed" => Ok(ProcessStatus::Failed),
            "finished" => Ok(ProcessStatus::Finished),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Errors from suffix map validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuffixMapError {
    #[error("suffix for {0} is empty")]
    Empty(ProcessStatus),
    #[error("suffix {0:?} must not contain a dot")]
    Dotted(String),
    #[error("duplicate suffix {0:?}")]
    Duplicate(String),
}

/// Explicit mapping from each status variant to its file suffix
///
/// Suffixes are stored without the leading dot; callers compose
/// `<name>.<suffix>` when building paths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixMap {
    running: String,
    failed: String,
    finished: String,
}

impl SuffixMap {
    pub fn new(
        running: impl Into<String>,
        failed: impl Into<String>,
        finished: impl Into<String>,
    ) -> Result<Self, SuffixMapError> {
        let map = Self {
            running: running.into(),
            failed: failed.into(),
            finished: finished.into(),
        };

        for (status, suffix) in [
            (ProcessStatus::Running, &map.running),
            (ProcessStatus::Failed, &map.failed),
            (ProcessStatus::Finished, &map.finished),
        ] {
            if suffix.is_empty() {
                return Err(SuffixMapError::Empty(status));
            }
            if suffix.contains('.') {
                return Err(SuffixMapError::Dotted(suffix.clone()));
            }
        }
        if map.running == map.failed || map.running == map.finished {
            return Err(SuffixMapError::Duplicate(map.running));
        }
        if map.failed == map.finished {
            return Err(SuffixMapError::Duplicate(map.failed));
        }

        Ok(map)
    }

    /// Stock map for process-owned files: tmp / err / fin
    pub fn process_files() -> Self {
        Self {
            running: "tmp".to_string(),
            failed: "err".to_string(),
            finished: "fin".to_string(),
        }
    }

    /// Stock map for instance markers: running / failed / finished
    pub fn instance_markers() -> Self {
        Self {
            running: "running".to_string(),
            failed: "failed".to_string(),
            finished: "finished".to_string(),
        }
    }

    pub fn for_status(&self, status: ProcessStatus) -> &str {
        match status {
            ProcessStatus::Running => &self.running,
            ProcessStatus::Failed => &self.failed,
            ProcessStatus::Finished => &self.finished,
        }
    }

    /// Candidate suffixes in lifecycle order: running, failed, finished
    pub fn candidates(&self) -> [&str; 3] {
        [&self.running, &self.failed, &self.finished]
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
