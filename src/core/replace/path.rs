use super::ReplaceOptions;
use crate::error::{Error, Result};
use crate::mapping::Mapping;
use crate::substitute;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Rename `path` by substituting mapped values in its final segment only.
///
/// Ancestor segments are never touched; they get renamed when the orchestrator
/// reaches them. Returns the new path, or `path` itself when the name does not
/// change, in which case no filesystem call is made.
pub fn rename_path(path: &Path, mapping: &Mapping, options: &ReplaceOptions) -> Result<PathBuf> {
    let Some(name) = path.file_name() else {
        return Ok(path.to_path_buf());
    };
    let Some(name) = name.to_str() else {
        log_status!("rename", "Skipping non-UTF-8 name {}", path.display());
        return Ok(path.to_path_buf());
    };

    let result = substitute::apply(name, mapping, options.strategy);
    if result.text == name {
        return Ok(path.to_path_buf());
    }

    validate_segment(path, &result.text)?;
    let target = path.with_file_name(&result.text);

    match fs::symlink_metadata(path) {
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::rename_source_missing(
                path.display().to_string(),
                target.display().to_string(),
            ));
        }
        Err(e) => {
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("stat {}", path.display())),
            ));
        }
    }

    if fs::symlink_metadata(&target).is_ok() && !same_entry(path, &target) {
        return Err(Error::rename_collision(
            path.display().to_string(),
            target.display().to_string(),
        ));
    }

    if options.dry_run {
        return Ok(target);
    }

    fs::rename(path, &target).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("rename {} -> {}", path.display(), target.display())),
        )
    })?;

    log_status!("rename", "{} -> {}", path.display(), target.display());
    Ok(target)
}

/// A rewritten name must still be a single, ordinary path segment.
fn validate_segment(path: &Path, segment: &str) -> Result<()> {
    let problem = if segment.is_empty() {
        Some("substitution produced an empty name")
    } else if segment == "." || segment == ".." {
        Some("substitution produced a relative path component")
    } else if segment.contains('/') || segment.contains(std::path::MAIN_SEPARATOR) {
        Some("substitution produced a path separator")
    } else {
        None
    };

    match problem {
        Some(problem) => Err(Error::validation_invalid_argument(
            "name",
            format!("{}: {} -> '{}'", problem, path.display(), segment),
            None,
            None,
        )),
        None => Ok(()),
    }
}

/// Whether two paths name the same filesystem entry, e.g. a case-only rename
/// on a case-insensitive filesystem.
#[cfg(unix)]
fn same_entry(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::symlink_metadata(a), fs::symlink_metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn same_entry(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
