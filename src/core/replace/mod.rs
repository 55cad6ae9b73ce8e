//! Bulk replacement: rewrite every mapped value to its key across a tree.
//!
//! File contents and file names are rewritten first, in any order. Directory
//! names follow, deepest first, so renaming a parent never invalidates a
//! path that is still waiting to be processed.

mod content;
mod journal;
mod orchestrator;
mod path;
mod snapshot;

pub use content::{rewrite, Rewrite};
pub use journal::{Journal, JournalEvent};
pub use orchestrator::run;
pub use path::rename_path;
pub use snapshot::Snapshot;

use crate::substitute::Strategy;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Knobs for a single run.
#[derive(Debug, Clone, Default)]
pub struct ReplaceOptions {
    pub strategy: Strategy,
    /// Compute the report without touching the filesystem.
    pub dry_run: bool,
    /// Leave files that are not valid UTF-8 untouched instead of failing.
    pub skip_non_text: bool,
    /// Append completed edits and renames to this JSON Lines file.
    pub journal: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

/// A content rewrite of one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEdit {
    /// File path relative to root, as captured in the snapshot.
    pub file: String,
    /// Number of replaced occurrences.
    pub replacements: usize,
}

/// A file or directory rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathRename {
    pub kind: EntryKind,
    /// Original path relative to root.
    pub from: String,
    /// New path relative to root.
    pub to: String,
}

/// Summary of a run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub root: String,
    pub strategy: Strategy,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub dirs_scanned: usize,
    pub edits: Vec<FileEdit>,
    pub renames: Vec<PathRename>,
    /// Files left untouched because they are not valid UTF-8.
    pub skipped: Vec<String>,
    pub total_replacements: usize,
}

/// Render `path` relative to `root` for reports.
pub(crate) fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
