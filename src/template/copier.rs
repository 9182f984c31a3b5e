//! Template tree copying with placeholder substitution.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::error::{InitError, Result};

use super::destination::Destination;
use super::placeholder::{has_placeholders, placeholder_keys, substitute};
use super::walk::{walk_tree, EntryKind};

/// Summary of a completed copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Destination root that was populated.
    pub destination: PathBuf,
    /// Directories created below the destination root.
    pub directories: usize,
    /// Files written.
    pub files: usize,
    /// Files whose content contained at least one token.
    pub templated_files: usize,
    /// Entries that were not copied (symlinked directories, broken links).
    pub skipped: Vec<PathBuf>,
    /// Token keys found in the template that had no answer.
    pub unresolved: BTreeSet<String>,
}

/// Copies a template tree into a fresh destination.
#[derive(Debug, Default, Clone, Copy)]
pub struct TemplateCopier;

impl TemplateCopier {
    /// Create a new copier.
    pub fn new() -> Self {
        Self
    }

    /// Reproduce `source` at `destination`, substituting tokens from `scope`.
    ///
    /// Anything already at `destination` is removed first. Every byte is
    /// written before this returns.
    pub fn copy(
        &self,
        source: &Path,
        destination: &Path,
        scope: &Configuration,
    ) -> Result<CopyReport> {
        if !source.is_dir() {
            return Err(InitError::TemplateNotFound {
                path: source.to_path_buf(),
            });
        }

        let entries = walk_tree(source)?;

        let mut dest = Destination::inspect(destination);
        dest.clear()?;

        let mut report = CopyReport::default();
        for entry in entries {
            match entry.kind {
                EntryKind::Directory => {
                    dest.create_dir(&entry.relative)?;
                    report.directories += 1;
                }
                EntryKind::File => {
                    let from = source.join(&entry.relative);
                    let content = fs::read(&from).map_err(|e| InitError::filesystem(&from, e))?;
                    let (rendered, templated) =
                        render(&content, scope, &mut report.unresolved);
                    dest.write_file(&entry.relative, &rendered)?;
                    report.files += 1;
                    if templated {
                        report.templated_files += 1;
                    }
                    tracing::debug!("Copied {}", entry.relative.display());
                }
                EntryKind::SymlinkedDirectory | EntryKind::BrokenSymlink => {
                    tracing::warn!(
                        "Skipping {} ({:?} is not copied)",
                        entry.relative.display(),
                        entry.kind
                    );
                    report.skipped.push(entry.relative);
                }
            }
        }

        if !report.unresolved.is_empty() {
            tracing::debug!("Tokens left unresolved: {:?}", report.unresolved);
        }

        report.destination = dest.finish()?;
        Ok(report)
    }
}

/// Substitute tokens in text content; non-UTF-8 content passes through.
///
/// Keys with no answer in `scope` are added to `unresolved`.
fn render<'a>(
    content: &'a [u8],
    scope: &Configuration,
    unresolved: &mut BTreeSet<String>,
) -> (Cow<'a, [u8]>, bool) {
    match std::str::from_utf8(content) {
        Ok(text) if has_placeholders(text) => {
            unresolved.extend(
                placeholder_keys(text)
                    .into_iter()
                    .filter(|key| scope.get(key).is_none())
                    .map(str::to_string),
            );
            (Cow::Owned(substitute(text, scope).into_bytes()), true)
        }
        _ => (Cow::Borrowed(content), false),
    }
}
