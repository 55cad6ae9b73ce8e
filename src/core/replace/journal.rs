use super::{EntryKind, FileEdit, PathRename};
use crate::error::{Error, Result};
use crate::substitute::Strategy;
use chrono::Local;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// One line of the journal.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum JournalEvent {
    Start {
        root: String,
        strategy: Strategy,
        started_at: String,
    },
    Edit {
        file: String,
        replacements: usize,
    },
    Rename {
        kind: EntryKind,
        from: String,
        to: String,
    },
}

/// Append-only JSON Lines record of completed mutations.
///
/// Every line is flushed as soon as the mutation it describes has finished,
/// so after an aborted run the journal lists exactly what was changed.
pub struct Journal {
    path: PathBuf,
    file: File,
}

impl Journal {
    /// Open (or create) `path` for appending and write the start line.
    pub fn open(path: &Path, root: &Path, strategy: Strategy) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                Error::internal_io(e.to_string(), Some(format!("open journal {}", path.display())))
            })?;

        let mut journal = Self {
            path: path.to_path_buf(),
            file,
        };
        journal.append(&JournalEvent::Start {
            root: root.display().to_string(),
            strategy,
            started_at: Local::now().to_rfc3339(),
        })?;
        Ok(journal)
    }

    pub fn record_edit(&mut self, edit: &FileEdit) -> Result<()> {
        self.append(&JournalEvent::Edit {
            file: edit.file.clone(),
            replacements: edit.replacements,
        })
    }

    pub fn record_rename(&mut self, rename: &PathRename) -> Result<()> {
        self.append(&JournalEvent::Rename {
            kind: rename.kind,
            from: rename.from.clone(),
            to: rename.to.clone(),
        })
    }

    fn append(&mut self, event: &JournalEvent) -> Result<()> {
        let line = serde_json::to_string(event).map_err(|e| {
            Error::internal_json(e.to_string(), Some("serialize journal event".to_string()))
        })?;

        writeln!(self.file, "{}", line)
            .and_then(|_| self.file.flush())
            .map_err(|e| {
                Error::internal_io(
                    e.to_string(),
                    Some(format!("write journal {}", self.path.display())),
                )
            })
    }
}
