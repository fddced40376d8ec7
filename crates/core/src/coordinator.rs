// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordination kernel facade
//!
//! One `Coordinator` per OS process. Bootstrap binds the working root,
//! claims a cluster-wide instance number, and attaches the logging
//! collaborator; afterwards it orchestrates the registries and the process
//! tracker, and tears down transient state at cleanup.

use crate::adapters::log::{LogError, LogSink};
use crate::claim::FileClaimer;
use crate::clock::Clock;
use crate::dirs::{DirectoryError, DirectoryRegistry};
use crate::files::{FileError, FileRegistry};
use crate::instance::claim_instance;
use crate::process::{ProcessTracker, TrackError};
use crate::retry::RetryPolicy;
use crate::status::{ProcessStatus, SuffixMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Logical name of the working root binding
pub const ROOT_DIR: &str = "root";
/// Logical name of the shared, multi-writer instances directory
pub const INSTANCES_DIR: &str = "instances";
/// Logical name of the log directory
pub const LOGS_DIR: &str = "logs";

const LOG_SUFFIX: &str = "log";

/// Errors surfaced by the coordinator
#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    #[error(transparent)]
    File(#[from] FileError),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error(transparent)]
    Log(#[from] LogError),
    #[error("log file {0} already exists")]
    LogFileExists(PathBuf),
    #[error("failed to resolve output root {path}: {source}")]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Coordinator configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Name shared by every process coordinating under the same root
    pub name: String,
    /// Directory the working root is created under
    pub output_root: PathBuf,
    /// Retry policy for the atomic claimer
    pub retry: RetryPolicy,
    /// Upper bound for a randomized pre-claim sleep; zero disables it
    #[serde(with = "humantime_serde")]
    pub startup_jitter: Duration,
}

impl CoordinatorConfig {
    pub fn new(name: impl Into<String>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            output_root: output_root.into(),
            retry: RetryPolicy::default(),
            startup_jitter: Duration::ZERO,
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_startup_jitter(mut self, max: Duration) -> Self {
        self.startup_jitter = max;
        self
    }
}

/// Serializable snapshot of one kernel instance
#[derive(Clone, Debug, Serialize)]
pub struct StatusReport {
    pub name: String,
    pub instance: u64,
    pub claimed_at: DateTime<Utc>,
    pub directories: BTreeMap<String, PathBuf>,
    pub processes: BTreeMap<String, ProcessStatus>,
}

/// Filesystem-backed coordination kernel for one OS process
#[derive(Debug)]
pub struct Coordinator<C: Clock, L: LogSink> {
    config: CoordinatorConfig,
    clock: C,
    log: L,
    root: PathBuf,
    dirs: DirectoryRegistry,
    files: FileRegistry<C>,
    tracker: ProcessTracker,
    instance: u64,
    /// Logical name of this instance's marker file: `<name>_<n>`
    instance_file: String,
    claimed_at: DateTime<Utc>,
    instance_markers: SuffixMap,
    process_suffixes: SuffixMap,
}

impl<C: Clock, L: LogSink> Coordinator<C, L> {
    /// Bind the working root, claim an instance number, and attach logging.
    ///
    /// The working root is `<output_root>/<name>`; the `instances`
    /// subdirectory underneath it is the one structure contended by every
    /// concurrent kernel instance pointed at the same root.
    pub fn bootstrap(
        config: CoordinatorConfig,
        clock: C,
        mut log: L,
    ) -> Result<Self, CoordinatorError> {
        if !config.startup_jitter.is_zero() {
            let span = config.startup_jitter.as_nanos() as u64;
            clock.sleep(Duration::from_nanos(fastrand::u64(0..span)));
        }

        let root = std::path::absolute(config.output_root.join(&config.name)).map_err(
            |source| CoordinatorError::InvalidRoot {
                path: config.output_root.clone(),
                source,
            },
        )?;

        let mut dirs = DirectoryRegistry::new();
        dirs.ensure(ROOT_DIR, &root)?;

        let claimer = FileClaimer::new(config.retry.clone(), clock.clone());
        let mut files = FileRegistry::new(claimer);

        let instances = dirs.ensure(INSTANCES_DIR, root.join(INSTANCES_DIR))?;
        let instance_markers = SuffixMap::instance_markers();
        let instance = claim_instance(
            &mut files,
            INSTANCES_DIR,
            &instances,
            &config.name,
            &instance_markers,
        )?;
        let instance_file = format!("{}_{}", config.name, instance);

        let logs = dirs.ensure(LOGS_DIR, root.join(LOGS_DIR))?;
        if !files.create(LOGS_DIR, &logs, &instance_file, &[LOG_SUFFIX])? {
            return Err(CoordinatorError::LogFileExists(
                logs.join(format!("{instance_file}.{LOG_SUFFIX}")),
            ));
        }
        let log_path = logs.join(format!("{instance_file}.{LOG_SUFFIX}"));
        log.attach_file(&format!("file_{instance}"), &log_path)?;
        log.attach_stream(&format!("stream_{instance}"))?;

        tracing::info!(name = %config.name, instance, "coordination kernel ready");
        for (dir_name, path) in dirs.iter() {
            tracing::info!(directory = dir_name, path = %path.display(), "bound");
        }

        Ok(Self {
            config,
            clock,
            log,
            root,
            dirs,
            files,
            tracker: ProcessTracker::new(),
            instance,
            instance_file,
            claimed_at: Utc::now(),
            instance_markers,
            process_suffixes: SuffixMap::process_files(),
        })
    }

    pub fn instance_number(&self) -> u64 {
        self.instance
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Resolve a logical directory name
    pub fn directory(&self, name: &str) -> Result<&Path, CoordinatorError> {
        Ok(self.dirs.resolve(name)?)
    }

    /// Bind `name` to `<root>/<name>`, creating the directory if needed
    pub fn ensure_directory(&mut self, name: &str) -> Result<PathBuf, CoordinatorError> {
        Ok(self.dirs.ensure(name, self.root.join(name))?)
    }

    /// Register a logical process and allocate its subdirectory
    pub fn track_process(&mut self, name: &str) -> Result<(), CoordinatorError> {
        let dir = self.tracker.track(name)?.dir.clone();
        self.dirs.ensure(&dir, self.root.join(&dir))?;
        Ok(())
    }

    /// Update a process's status and move its files to the matching suffix.
    ///
    /// Re-setting the current status is a no-op; leaving a terminal status
    /// is an error.
    pub fn set_process_status(
        &mut self,
        name: &str,
        status: ProcessStatus,
    ) -> Result<(), CoordinatorError> {
        if !self.tracker.set_status(name, status)? {
            return Ok(());
        }

        let dir = self.tracker.get(name)?.dir.clone();
        let suffix = self.process_suffixes.for_status(status).to_string();
        let owned: Vec<String> = self.files.in_dir(&dir).map(|f| f.name().to_string()).collect();
        for file in owned {
            self.files.transition(&dir, &file, &suffix)?;
        }
        Ok(())
    }

    /// Create a file in a process's subdirectory, starting in the transient
    /// suffix. Returns whether this caller won the creation.
    pub fn create_process_file(
        &mut self,
        process: &str,
        file: &str,
    ) -> Result<bool, CoordinatorError> {
        let dir = self.tracker.get(process)?.dir.clone();
        let dir_path = self.dirs.resolve(&dir)?.to_path_buf();
        let candidates = self.process_suffixes.candidates();
        Ok(self.files.create(&dir, &dir_path, file, &candidates)?)
    }

    /// Move a process file to the suffix matching `status`
    pub fn update_process_file(
        &mut self,
        process: &str,
        file: &str,
        status: ProcessStatus,
    ) -> Result<(), CoordinatorError> {
        let dir = self.tracker.get(process)?.dir.clone();
        let suffix = self.process_suffixes.for_status(status).to_string();
        self.files.transition(&dir, file, &suffix)?;
        Ok(())
    }

    /// Delete a process file and forget it
    pub fn remove_process_file(&mut self, process: &str, file: &str) -> Result<(), CoordinatorError> {
        let dir = self.tracker.get(process)?.dir.clone();
        self.files.remove(&dir, file)?;
        Ok(())
    }

    /// Move this instance's marker to `.failed`; the marker then survives
    /// cleanup as an audit record
    pub fn mark_failed(&mut self) -> Result<(), CoordinatorError> {
        self.set_instance_status(ProcessStatus::Failed)
    }

    /// Move this instance's marker to `.finished`
    pub fn mark_finished(&mut self) -> Result<(), CoordinatorError> {
        self.set_instance_status(ProcessStatus::Finished)
    }

    fn set_instance_status(&mut self, status: ProcessStatus) -> Result<(), CoordinatorError> {
        let suffix = self.instance_markers.for_status(status).to_string();
        self.files
            .transition(INSTANCES_DIR, &self.instance_file, &suffix)?;
        Ok(())
    }

    /// Snapshot of directories, processes, and the instance claim
    pub fn status(&self) -> StatusReport {
        StatusReport {
            name: self.config.name.clone(),
            instance: self.instance,
            claimed_at: self.claimed_at,
            directories: self
                .dirs
                .iter()
                .map(|(name, path)| (name.to_string(), path.to_path_buf()))
                .collect(),
            processes: self
                .tracker
                .iter()
                .map(|p| (p.name.clone(), p.status))
                .collect(),
        }
    }

    /// Best-effort teardown: remove every file still carrying a transient
    /// suffix, then release the logging collaborator.
    ///
    /// Individual removal failures are logged and never stop the remaining
    /// steps.
    pub fn cleanup(&mut self) {
        tracing::info!(instance = self.instance, "cleaning up");

        let transient = self
            .process_suffixes
            .for_status(ProcessStatus::Running)
            .to_string();
        self.files.remove_all_with_suffix(&transient);

        let marker = self
            .instance_markers
            .for_status(ProcessStatus::Running)
            .to_string();
        self.files.remove_all_with_suffix(&marker);

        self.log.detach_all();
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
