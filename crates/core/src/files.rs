// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! File registry: logical names bound to suffix-encoded physical files
//!
//! Each entry is a (directory name, logical name) pair owning at most one
//! physical file, whose suffix encodes its lifecycle state. Creation goes
//! through the atomic claimer; the pre-scan over candidate suffixes is only
//! a fast filter — the exclusive create is the final arbiter.

use crate::claim::{ClaimError, ClaimOutcome, FileClaimer};
use crate::clock::Clock;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from file registration and lifecycle operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("no file {name:?} registered under directory {dir:?}")]
    UnknownFile { dir: String, name: String },
    #[error("no candidate suffixes given for {name:?} in directory {dir:?}")]
    NoCandidates { dir: String, name: String },
    #[error(transparent)]
    Claim(#[from] ClaimError),
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A logical file bound to one suffix-encoded physical file
#[derive(Clone, Debug)]
pub struct TrackedFile {
    dir: String,
    dir_path: PathBuf,
    name: String,
    suffix: String,
}

impl TrackedFile {
    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Current physical path: `<dir_path>/<name>.<suffix>`
    pub fn path(&self) -> PathBuf {
        self.dir_path.join(format!("{}.{}", self.name, self.suffix))
    }
}

/// Tracks logical files and drives their suffix transitions
#[derive(Clone, Debug)]
pub struct FileRegistry<C: Clock> {
    claimer: FileClaimer<C>,
    entries: HashMap<(String, String), TrackedFile>,
}

impl<C: Clock> FileRegistry<C> {
    pub fn new(claimer: FileClaimer<C>) -> Self {
        Self {
            claimer,
            entries: HashMap::new(),
        }
    }

    /// Atomically create and register `<name>.<candidates[0]>` in `dir_path`.
    ///
    /// Fails closed: if *any* candidate suffix already has a matching
    /// physical file the lifecycle has advanced elsewhere, and the answer is
    /// `false` without touching the disk. Losing the final atomic create is
    /// also `false` — ordinary contention, not an error.
    pub fn create(
        &mut self,
        dir: &str,
        dir_path: &Path,
        name: &str,
        candidates: &[&str],
    ) -> Result<bool, FileError> {
        let first = candidates.first().ok_or_else(|| FileError::NoCandidates {
            dir: dir.to_string(),
            name: name.to_string(),
        })?;

        for suffix in candidates {
            let probe = dir_path.join(format!("{name}.{suffix}"));
            if probe.exists() {
                tracing::trace!(path = %probe.display(), "suffix already materialized");
                return Ok(false);
            }
        }

        let path = dir_path.join(format!("{name}.{first}"));
        match self.claimer.try_create(&path)? {
            ClaimOutcome::Created => {
                self.entries.insert(
                    (dir.to_string(), name.to_string()),
                    TrackedFile {
                        dir: dir.to_string(),
                        dir_path: dir_path.to_path_buf(),
                        name: name.to_string(),
                        suffix: first.to_string(),
                    },
                );
                Ok(true)
            }
            ClaimOutcome::AlreadyExists => Ok(false),
        }
    }

    /// Rename the physical file to `new_suffix` and update the entry.
    ///
    /// A missing physical file is an anomaly worth surfacing but not a
    /// failure: the registry entry is updated regardless.
    pub fn transition(&mut self, dir: &str, name: &str, new_suffix: &str) -> Result<(), FileError> {
        let key = (dir.to_string(), name.to_string());
        let entry = self.entries.get_mut(&key).ok_or_else(|| FileError::UnknownFile {
            dir: dir.to_string(),
            name: name.to_string(),
        })?;

        if entry.suffix == new_suffix {
            return Ok(());
        }

        let from = entry.path();
        let to = entry
            .dir_path
            .join(format!("{}.{}", entry.name, new_suffix));

        if from.exists() {
            fs::rename(&from, &to).map_err(|source| FileError::Io {
                action: "rename",
                path: from.clone(),
                source,
            })?;
            tracing::debug!(from = %from.display(), to = %to.display(), "transitioned");
        } else {
            tracing::warn!(
                path = %from.display(),
                "physical file missing during transition, updating registry only"
            );
        }

        entry.suffix = new_suffix.to_string();
        Ok(())
    }

    /// Delete the physical file if present and drop the entry.
    ///
    /// Unconditionally idempotent: an unregistered name or an already
    /// deleted file is not an error.
    pub fn remove(&mut self, dir: &str, name: &str) -> Result<(), FileError> {
        let key = (dir.to_string(), name.to_string());
        let Some(entry) = self.entries.remove(&key) else {
            return Ok(());
        };

        let path = entry.path();
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "already gone");
                Ok(())
            }
            Err(source) => Err(FileError::Io {
                action: "remove",
                path,
                source,
            }),
        }
    }

    /// Best-effort sweep: remove every registered file whose current suffix
    /// matches. Individual failures are logged and do not stop the sweep.
    pub fn remove_all_with_suffix(&mut self, suffix: &str) {
        let matching: Vec<(String, String)> = self
            .entries
            .values()
            .filter(|f| f.suffix == suffix)
            .map(|f| (f.dir.clone(), f.name.clone()))
            .collect();

        for (dir, name) in matching {
            if let Err(e) = self.remove(&dir, &name) {
                tracing::warn!(dir, name, error = %e, "sweep removal failed, continuing");
            }
        }
    }

    /// Look up a registered file
    pub fn get(&self, dir: &str, name: &str) -> Option<&TrackedFile> {
        self.entries.get(&(dir.to_string(), name.to_string()))
    }

    /// Iterate over the files registered under one directory
    pub fn in_dir<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a TrackedFile> + 'a {
        self.entries.values().filter(move |f| f.dir == dir)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;
