// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Logging collaborator interface
//!
//! The kernel never builds subscribers or appenders itself. It asks this
//! trait for a handle that writes structured lines to a file and to
//! standard output, and releases the handles at cleanup. The production
//! implementation lives in `warren-adapters`.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from handler attachment
#[derive(Debug, Error)]
pub enum LogError {
    #[error("failed to open log file {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// External logging subsystem, attached at bootstrap and released at cleanup
pub trait LogSink {
    /// Attach a file handler writing to `path`. Attaching a handler id that
    /// already exists replaces it (with a warning).
    fn attach_file(&mut self, handler_id: &str, path: &Path) -> Result<(), LogError>;

    /// Attach a handler writing to standard output
    fn attach_stream(&mut self, handler_id: &str) -> Result<(), LogError>;

    /// Release every handler, flushing buffered output
    fn detach_all(&mut self);
}

/// Sink that ignores everything; the library default
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogSink;

impl LogSink for NoOpLogSink {
    fn attach_file(&mut self, _handler_id: &str, _path: &Path) -> Result<(), LogError> {
        Ok(())
    }

    fn attach_stream(&mut self, _handler_id: &str) -> Result<(), LogError> {
        Ok(())
    }

    fn detach_all(&mut self) {}
}

/// One recorded sink interaction
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogCall {
    AttachFile { handler_id: String, path: PathBuf },
    AttachStream { handler_id: String },
    DetachAll,
}

/// Sink that records calls for assertions in tests
#[derive(Clone, Debug, Default)]
pub struct RecordingLogSink {
    pub calls: Vec<LogCall>,
}

impl RecordingLogSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for RecordingLogSink {
    fn attach_file(&mut self, handler_id: &str, path: &Path) -> Result<(), LogError> {
        self.calls.push(LogCall::AttachFile {
            handler_id: handler_id.to_string(),
            path: path.to_path_buf(),
        });
        Ok(())
    }

    fn attach_stream(&mut self, handler_id: &str) -> Result<(), LogError> {
        self.calls.push(LogCall::AttachStream {
            handler_id: handler_id.to_string(),
        });
        Ok(())
    }

    fn detach_all(&mut self) {
        self.calls.push(LogCall::DetachAll);
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
