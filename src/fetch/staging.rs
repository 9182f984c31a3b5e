//! Staging directory for archive extraction.
//!
//! The staging directory is never cleaned up after a failed run. It is
//! force-removed at the start of the next one instead.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InitError, Result};

/// Directory name used below the platform temp directory.
pub const STAGING_DIR_NAME: &str = "titan-init-boilerplate";

/// Default staging location.
pub fn default_staging_dir() -> PathBuf {
    std::env::temp_dir().join(STAGING_DIR_NAME)
}

/// An ephemeral extraction target owned by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Use `path` as the staging directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The staging path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove whatever is at the staging path, tolerating absence, and
    /// recreate it empty.
    pub fn reset(&self) -> Result<()> {
        match fs::symlink_metadata(&self.path) {
            Ok(meta) => {
                let removed = if meta.is_dir() {
                    fs::remove_dir_all(&self.path)
                } else {
                    fs::remove_file(&self.path)
                };
                removed.map_err(|e| InitError::filesystem(&self.path, e))?;
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(InitError::filesystem(&self.path, e)),
        }

        fs::create_dir_all(&self.path).map_err(|e| InitError::filesystem(&self.path, e))?;
        tracing::debug!("Reset staging directory {}", self.path.display());
        Ok(())
    }
}

impl Default for StagingDir {
    fn default() -> Self {
        Self::new(default_staging_dir())
    }
}
