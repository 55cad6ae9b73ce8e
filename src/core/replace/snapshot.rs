use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Every regular file and directory under a root, captured once before any
/// mutation. Paths are never refreshed afterwards.
///
/// Symlinks and other special entries are neither recorded nor followed.
/// The root itself is not part of the snapshot.
#[derive(Debug, Clone)]
pub struct Snapshot {
    files: Vec<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl Snapshot {
    pub fn capture(root: &Path) -> Result<Self> {
        let meta = fs::metadata(root).map_err(|e| {
            Error::validation_invalid_argument(
                "root",
                format!("Cannot access {}: {}", root.display(), e),
                None,
                None,
            )
        })?;

        if !meta.is_dir() {
            return Err(Error::validation_invalid_argument(
                "root",
                format!("Not a directory: {}", root.display()),
                None,
                None,
            ));
        }

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        walk_recursive(root, &mut files, &mut dirs)?;

        // read_dir order is platform-defined
        files.sort();
        dirs.sort();

        Ok(Self { files, dirs })
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Directories ordered so that every directory comes after all of its
    /// descendants: decreasing depth, ties in reverse lexicographic order.
    pub fn dirs_bottom_up(&self) -> Vec<&Path> {
        let mut ordered: Vec<&Path> = self.dirs.iter().map(PathBuf::as_path).collect();
        ordered.sort_by(|a, b| {
            depth(b)
                .cmp(&depth(a))
                .then_with(|| b.as_os_str().cmp(a.as_os_str()))
        });
        ordered
    }
}

fn depth(path: &Path) -> usize {
    path.components().count()
}

fn walk_recursive(dir: &Path, files: &mut Vec<PathBuf>, dirs: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| {
        Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("list {}", dir.display())))
        })?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("stat {}", path.display())))
        })?;

        if file_type.is_dir() {
            walk_recursive(&path, files, dirs)?;
            dirs.push(path);
        } else if file_type.is_file() {
            files.push(path);
        } else {
            log_status!("scan", "Skipping special entry {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn capture_lists_files_and_dirs_but_not_root() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("top.txt"), "x").unwrap();
        fs::write(root.join("a/b/leaf.txt"), "y").unwrap();

        let snapshot = Snapshot::capture(root).unwrap();

        assert_eq!(snapshot.files().len(), 2);
        assert_eq!(snapshot.dirs(), &[root.join("a"), root.join("a/b")]);
        assert!(!snapshot.dirs().contains(&root.to_path_buf()));
    }

    #[test]
    fn dirs_bottom_up_puts_descendants_first() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("fooZ/barZ/bazZ")).unwrap();
        fs::create_dir_all(root.join("fooZ-sibling")).unwrap();
        fs::create_dir_all(root.join("other")).unwrap();

        let snapshot = Snapshot::capture(root).unwrap();
        let ordered = snapshot.dirs_bottom_up();

        let position = |p: &Path| ordered.iter().position(|d| *d == p).unwrap();
        assert!(position(root.join("fooZ/barZ/bazZ").as_path()) < position(root.join("fooZ/barZ").as_path()));
        assert!(position(root.join("fooZ/barZ").as_path()) < position(root.join("fooZ").as_path()));
        assert_eq!(ordered.len(), 5);
    }

    #[test]
    fn capture_rejects_missing_root() {
        let dir = tempdir().unwrap();
        let err = Snapshot::capture(&dir.path().join("missing")).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn capture_rejects_file_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();

        let err = Snapshot::capture(&file).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
    }

    #[test]
    fn snapshot_is_not_refreshed_after_mutation() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("before.txt"), "x").unwrap();

        let snapshot = Snapshot::capture(root).unwrap();
        fs::write(root.join("after.txt"), "y").unwrap();

        assert_eq!(snapshot.files(), &[root.join("before.txt")]);
    }

    #[cfg(unix)]
    #[test]
    fn capture_skips_symlinks() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join("real")).unwrap();
        fs::write(root.join("real/file.txt"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let snapshot = Snapshot::capture(root).unwrap();

        assert_eq!(snapshot.dirs(), &[root.join("real")]);
        assert_eq!(snapshot.files(), &[root.join("real/file.txt")]);
    }
}
