// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing-backed implementation of the core's `LogSink` collaborator
//!
//! One fmt layer is installed on first attach, writing through a fan-out
//! `MakeWriter` whose target list can change afterwards. Attaching a file
//! handler adds a non-blocking appender (its `WorkerGuard` is held until
//! `detach_all`, which drops the guards and flushes buffered lines).

use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use warren_core::adapters::{LogError, LogSink};

type Targets = Arc<Mutex<Vec<(String, Target)>>>;

#[derive(Clone)]
enum Target {
    Stdout,
    File(NonBlocking),
}

/// Writer factory handed to the fmt layer; shares the live target list
#[derive(Clone, Default)]
struct FanoutWriter {
    targets: Targets,
}

struct FanoutIo {
    targets: Targets,
}

impl Write for FanoutIo {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
        for (_, target) in targets.iter_mut() {
            match target {
                Target::Stdout => io::stdout().write_all(buf)?,
                Target::File(writer) => writer.write_all(buf)?,
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
        for (_, target) in targets.iter_mut() {
            match target {
                Target::Stdout => io::stdout().flush()?,
                Target::File(writer) => writer.flush()?,
            }
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FanoutWriter {
    type Writer = FanoutIo;

    fn make_writer(&'a self) -> Self::Writer {
        FanoutIo {
            targets: Arc::clone(&self.targets),
        }
    }
}

/// Production `LogSink` on the tracing stack
pub struct TracingLogSink {
    targets: Targets,
    guards: Vec<(String, WorkerGuard)>,
    installed: bool,
}

impl TracingLogSink {
    pub fn new() -> Self {
        Self {
            targets: Arc::default(),
            guards: Vec::new(),
            installed: false,
        }
    }

    fn install(&mut self) {
        if self.installed {
            return;
        }
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let writer = FanoutWriter {
            targets: Arc::clone(&self.targets),
        };
        // The host may already own a global subscriber; in that case warren
        // writes through it and this layer stays dormant.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(writer))
            .try_init();
        self.installed = true;
    }

    fn push_target(&mut self, handler_id: &str, target: Target) {
        let replaced;
        {
            let mut targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
            replaced = targets.iter().any(|(id, _)| id == handler_id);
            targets.retain(|(id, _)| id != handler_id);
            targets.push((handler_id.to_string(), target));
        }
        if replaced {
            // Emitted after the lock is released: the event itself may be
            // routed through FanoutIo.
            self.guards.retain(|(id, _)| id != handler_id);
            tracing::warn!(handler = handler_id, "handler already attached, replacing");
        }
    }
}

impl Default for TracingLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogSink for TracingLogSink {
    fn attach_file(&mut self, handler_id: &str, path: &Path) -> Result<(), LogError> {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or_else(|| LogError::Open {
                path: path.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "log path has no parent directory",
                ),
            })?;
        let file_name = path.file_name().ok_or_else(|| LogError::Open {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"),
        })?;

        let appender = tracing_appender::rolling::never(dir, file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        self.push_target(handler_id, Target::File(writer));
        self.guards.push((handler_id.to_string(), guard));
        self.install();
        Ok(())
    }

    fn attach_stream(&mut self, handler_id: &str) -> Result<(), LogError> {
        self.push_target(handler_id, Target::Stdout);
        self.install();
        Ok(())
    }

    fn detach_all(&mut self) {
        {
            let mut targets = self.targets.lock().unwrap_or_else(|e| e.into_inner());
            targets.clear();
        }
        // Dropping the worker guards flushes buffered lines.
        self.guards.clear();
    }
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
