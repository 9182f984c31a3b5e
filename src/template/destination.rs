//! Destination directory lifecycle.
//!
//! The destination moves through a single forced path:
//!
//! ```text
//! Absent ──┐
//!          ├──> Cleared ──> Populated
//! Existing ┘
//! ```
//!
//! Nothing can be written until [`Destination::clear`] has run, so the
//! result is never a mix of stale and freshly copied content.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InitError, Result};

/// Lifecycle state of a destination directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing exists at the destination path.
    Absent,
    /// Something exists at the destination path and has not been removed.
    Existing,
    /// The destination is a fresh, empty directory.
    Cleared,
    /// At least one entry has been written since clearing.
    Populated,
}

/// A destination directory owned by one copy operation.
#[derive(Debug)]
pub struct Destination {
    root: PathBuf,
    state: DestinationState,
}

impl Destination {
    /// Inspect `root` and record whether anything already exists there.
    pub fn inspect(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let state = if root.symlink_metadata().is_ok() {
            DestinationState::Existing
        } else {
            DestinationState::Absent
        };
        Self { root, state }
    }

    /// The destination root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DestinationState {
        self.state
    }

    /// Remove anything at the root and recreate it as an empty directory.
    ///
    /// Parent directories are created as needed.
    pub fn clear(&mut self) -> Result<()> {
        if let Ok(meta) = self.root.symlink_metadata() {
            let removed = if meta.is_dir() {
                fs::remove_dir_all(&self.root)
            } else {
                fs::remove_file(&self.root)
            };
            removed.map_err(|e| InitError::filesystem(&self.root, e))?;
            tracing::debug!("Removed existing destination {}", self.root.display());
        }

        fs::create_dir_all(&self.root).map_err(|e| InitError::filesystem(&self.root, e))?;
        self.state = DestinationState::Cleared;
        Ok(())
    }

    /// Create a directory (and its ancestors) below the root.
    pub fn create_dir(&mut self, relative: &Path) -> Result<PathBuf> {
        self.ensure_writable()?;
        let path = self.root.join(relative);
        fs::create_dir_all(&path).map_err(|e| InitError::filesystem(&path, e))?;
        self.state = DestinationState::Populated;
        Ok(path)
    }

    /// Write `content` to a file below the root, replacing any previous
    /// content completely.
    pub fn write_file(&mut self, relative: &Path, content: &[u8]) -> Result<PathBuf> {
        self.ensure_writable()?;
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| InitError::filesystem(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| InitError::filesystem(&path, e))?;
        self.state = DestinationState::Populated;
        Ok(path)
    }

    /// Finish the lifecycle and hand back the root path.
    pub fn finish(self) -> Result<PathBuf> {
        self.ensure_writable()?;
        Ok(self.root)
    }

    fn ensure_writable(&self) -> Result<()> {
        match self.state {
            DestinationState::Cleared | DestinationState::Populated => Ok(()),
            DestinationState::Absent | DestinationState::Existing => {
                Err(InitError::DestinationNotCleared {
                    path: self.root.clone(),
                })
            }
        }
    }
}
