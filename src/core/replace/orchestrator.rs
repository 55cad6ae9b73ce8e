use super::content::{self, Rewrite};
use super::journal::Journal;
use super::path::rename_path;
use super::snapshot::Snapshot;
use super::{relative, EntryKind, FileEdit, PathRename, ReplaceOptions, RunReport};
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use std::fs;
use std::path::Path;

/// Replace every mapped value with its key across the tree under `root`.
///
/// 1. Capture a snapshot of all files and directories (once, before mutating).
/// 2. For each file: rewrite its content, then rename it.
/// 3. Rename directories deepest first.
///
/// The first failure aborts the run. Whatever was already changed stays
/// changed; pass a journal path to get a record of it. The journal must live
/// outside `root`.
pub fn run(root: &Path, mapping: &Mapping, options: &ReplaceOptions) -> Result<RunReport> {
    let snapshot = Snapshot::capture(root)?;
    if let Some(journal) = &options.journal {
        ensure_outside_root(root, journal)?;
    }
    log_status!(
        "scan",
        "{} files, {} directories under {}",
        snapshot.files().len(),
        snapshot.dirs().len(),
        root.display()
    );

    let mut journal = match &options.journal {
        Some(path) if !options.dry_run => Some(Journal::open(path, root, options.strategy)?),
        _ => None,
    };

    let mut report = RunReport {
        root: root.display().to_string(),
        strategy: options.strategy,
        dry_run: options.dry_run,
        files_scanned: snapshot.files().len(),
        dirs_scanned: snapshot.dirs().len(),
        edits: Vec::new(),
        renames: Vec::new(),
        skipped: Vec::new(),
        total_replacements: 0,
    };

    // Files are leaves: renaming one never moves another snapshot entry.
    for file in snapshot.files() {
        match content::rewrite(file, mapping, options)? {
            Rewrite::Rewritten { replacements } => {
                let edit = FileEdit {
                    file: relative(root, file),
                    replacements,
                };
                if let Some(journal) = journal.as_mut() {
                    journal.record_edit(&edit)?;
                }
                report.total_replacements += replacements;
                report.edits.push(edit);
            }
            Rewrite::SkippedNonText => report.skipped.push(relative(root, file)),
            Rewrite::Unchanged => {}
        }

        let renamed = rename_path(file, mapping, options)?;
        if renamed != *file {
            record_rename(&mut report, journal.as_mut(), root, EntryKind::File, file, &renamed)?;
        }
    }

    for dir in snapshot.dirs_bottom_up() {
        let renamed = rename_path(dir, mapping, options)?;
        if renamed != dir {
            record_rename(&mut report, journal.as_mut(), root, EntryKind::Directory, dir, &renamed)?;
        }
    }

    log_status!(
        "done",
        "{} edits, {} renames{}",
        report.edits.len(),
        report.renames.len(),
        if options.dry_run { " (dry run)" } else { "" }
    );

    Ok(report)
}

/// A journal under `root` would be snapshotted and rewritten by the run that
/// appends to it.
fn ensure_outside_root(root: &Path, journal: &Path) -> Result<()> {
    let resolve = |path: &Path| {
        fs::canonicalize(path).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("resolve {}", path.display())))
        })
    };

    let root = resolve(root)?;
    let parent = match journal.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let parent = resolve(parent)?;

    if parent.starts_with(&root) {
        return Err(Error::validation_invalid_argument(
            "journal",
            format!(
                "Journal {} is inside the tree under {}",
                journal.display(),
                root.display()
            ),
            None,
            None,
        )
        .with_hint("Write the journal to a path outside the root directory"));
    }

    Ok(())
}

fn record_rename(
    report: &mut RunReport,
    journal: Option<&mut Journal>,
    root: &Path,
    kind: EntryKind,
    from: &Path,
    to: &Path,
) -> Result<()> {
    let rename = PathRename {
        kind,
        from: relative(root, from),
        to: relative(root, to),
    };
    if let Some(journal) = journal {
        journal.record_rename(&rename)?;
    }
    report.renames.push(rename);
    Ok(())
}
