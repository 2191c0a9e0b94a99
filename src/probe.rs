//! Filesystem probing
//!
//! Read-only checks the detectors rely on. A missing directory is a normal
//! negative answer; only a failed listing is an error.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::ExtError;

pub trait FileProbe {
    /// `true` only if `path` exists and is a directory. Never fails.
    fn is_dir(&self, path: &Path) -> bool;

    /// File names of the direct children of `path`.
    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ExtError>;

    /// Create `path` and any missing parents.
    fn ensure_dir(&self, path: &Path) -> Result<(), ExtError>;
}

/// [`FileProbe`] backed by the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl FileProbe for LocalFs {
    fn is_dir(&self, path: &Path) -> bool {
        fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
    }

    fn list_entries(&self, path: &Path) -> Result<Vec<String>, ExtError> {
        let mut names = Vec::new();
        for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| ExtError::probe(path, e))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    fn ensure_dir(&self, path: &Path) -> Result<(), ExtError> {
        fs::create_dir_all(path).map_err(|e| ExtError::probe(path, e))
    }
}
