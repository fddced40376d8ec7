// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory registry: logical names bound to absolute paths
//!
//! A name, once bound, resolves to the same path for the lifetime of the
//! kernel instance. Rebinding to a different path is a configuration error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from directory binding and resolution
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("directory {name:?} is bound to {bound}, refusing rebind to {requested}")]
    PathMismatch {
        name: String,
        bound: PathBuf,
        requested: PathBuf,
    },
    #[error("unknown directory: {0:?}")]
    Unknown(String),
    #[error("failed to create directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Maps logical directory names to absolute paths under one working root
#[derive(Clone, Debug, Default)]
pub struct DirectoryRegistry {
    dirs: HashMap<String, PathBuf>,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        Self {
            dirs: HashMap::new(),
        }
    }

    /// Create `path` if missing (with parents) and bind `name` to it.
    ///
    /// Idempotent for identical arguments. Fails with `PathMismatch` if the
    /// name is already bound to a different path.
    pub fn ensure(
        &mut self,
        name: &str,
        path: impl Into<PathBuf>,
    ) -> Result<PathBuf, DirectoryError> {
        let path = path.into();

        if let Some(bound) = self.dirs.get(name) {
            if *bound != path {
                return Err(DirectoryError::PathMismatch {
                    name: name.to_string(),
                    bound: bound.clone(),
                    requested: path,
                });
            }
            return Ok(path);
        }

        if path.exists() {
            tracing::debug!(name, path = %path.display(), "path already exists, binding");
        } else {
            tracing::info!(name, path = %path.display(), "creating directory");
        }
        fs::create_dir_all(&path).map_err(|source| DirectoryError::Create {
            path: path.clone(),
            source,
        })?;

        self.dirs.insert(name.to_string(), path.clone());
        Ok(path)
    }

    /// Resolve a logical name to its bound path
    pub fn resolve(&self, name: &str) -> Result<&Path, DirectoryError> {
        self.dirs
            .get(name)
            .map(PathBuf::as_path)
            .ok_or_else(|| DirectoryError::Unknown(name.to_string()))
    }

    /// Whether a name is bound
    pub fn contains(&self, name: &str) -> bool {
        self.dirs.contains_key(name)
    }

    /// Iterate over all bindings
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.dirs.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

#[cfg(test)]
#[path = "dirs_tests.rs"]
mod tests;
