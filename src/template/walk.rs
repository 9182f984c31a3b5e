//! Template tree enumeration.
//!
//! Lists every entry below a root, dotfiles included, in pre-order so a
//! directory always precedes the entries inside it. Symbolic links are
//! inspected without being followed into: a link to a file is reported as a
//! file, a link to a directory is reported but never traversed.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{InitError, Result};

/// Kind of an enumerated entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A real directory (traversed).
    Directory,
    /// A regular file or a symbolic link to one.
    File,
    /// A symbolic link to a directory (not traversed).
    SymlinkedDirectory,
    /// A symbolic link whose target does not exist.
    BrokenSymlink,
}

/// An entry discovered below the walk root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the walk root.
    pub relative: PathBuf,
    /// What the entry is.
    pub kind: EntryKind,
}

impl FileEntry {
    /// Whether this entry is a directory to materialize.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Whether this entry carries content to copy.
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Enumerate all entries below `root`.
///
/// Siblings are sorted by name so output is stable across platforms.
pub fn walk_tree(root: &Path) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::new();
    walk_dir(root, Path::new(""), &mut entries)?;
    Ok(entries)
}

fn walk_dir(root: &Path, relative: &Path, entries: &mut Vec<FileEntry>) -> Result<()> {
    let dir = root.join(relative);
    let mut children: Vec<_> = fs::read_dir(&dir)
        .map_err(|e| InitError::filesystem(&dir, e))?
        .collect::<std::io::Result<_>>()
        .map_err(|e| InitError::filesystem(&dir, e))?;
    children.sort_by_key(|entry| entry.file_name());

    for child in children {
        let child_relative = relative.join(child.file_name());
        let path = child.path();
        let kind = classify(&path)?;

        entries.push(FileEntry {
            relative: child_relative.clone(),
            kind,
        });

        if kind == EntryKind::Directory {
            walk_dir(root, &child_relative, entries)?;
        }
    }

    Ok(())
}

fn classify(path: &Path) -> Result<EntryKind> {
    let meta = fs::symlink_metadata(path).map_err(|e| InitError::filesystem(path, e))?;
    let file_type = meta.file_type();

    if file_type.is_dir() {
        return Ok(EntryKind::Directory);
    }
    if !file_type.is_symlink() {
        return Ok(EntryKind::File);
    }

    match fs::metadata(path) {
        Ok(target) if target.is_dir() => Ok(EntryKind::SymlinkedDirectory),
        Ok(_) => Ok(EntryKind::File),
        Err(_) => Ok(EntryKind::BrokenSymlink),
    }
}
