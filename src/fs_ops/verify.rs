//! Tree statistics used to verify a copy before its source is removed, and
//! symlink-safe removal of a pasted source.

use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

use super::helpers::transfer_io;
use crate::errors::TransferError;

/// Shape of a file tree: entry counts plus total bytes of regular files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
    pub files: u64,
    pub dirs: u64,
    pub symlinks: u64,
    pub bytes: u64,
}

impl TreeStats {
    pub(crate) fn record(&mut self, ft: fs::FileType, len: u64) {
        if ft.is_symlink() {
            self.symlinks += 1;
        } else if ft.is_dir() {
            self.dirs += 1;
        } else {
            self.files += 1;
            self.bytes += len;
        }
    }

    /// Human readable difference against `other`, or None when equal.
    fn diff(&self, other: &TreeStats) -> Option<String> {
        let mut parts = Vec::new();
        if self.files != other.files {
            parts.push(format!("files {} vs {}", self.files, other.files));
        }
        if self.dirs != other.dirs {
            parts.push(format!("dirs {} vs {}", self.dirs, other.dirs));
        }
        if self.symlinks != other.symlinks {
            parts.push(format!("symlinks {} vs {}", self.symlinks, other.symlinks));
        }
        if self.bytes != other.bytes {
            parts.push(format!("bytes {} vs {}", self.bytes, other.bytes));
        }
        if parts.is_empty() { None } else { Some(parts.join(", ")) }
    }
}

/// Walk `path` without following links and tally what is found.
pub fn tree_stats(path: &Path) -> io::Result<TreeStats> {
    let mut stats = TreeStats::default();
    let root = fs::symlink_metadata(path)?;
    if root.file_type().is_symlink() {
        stats.record(root.file_type(), 0);
        return Ok(stats);
    }
    for entry in WalkDir::new(path).follow_links(false) {
        let entry = entry.map_err(io::Error::from)?;
        let len = if entry.file_type().is_file() {
            entry.metadata().map_err(io::Error::from)?.len()
        } else {
            0
        };
        stats.record(entry.file_type(), len);
    }
    Ok(stats)
}

/// Compare the trees at `src` and `target`; a mismatch is `VerificationFailed`.
pub fn verify_copy(src: &Path, target: &Path) -> Result<TreeStats, TransferError> {
    let expected = tree_stats(src).map_err(transfer_io("scan source", src))?;
    let actual = tree_stats(target).map_err(transfer_io("scan copy", target))?;
    match expected.diff(&actual) {
        None => Ok(actual),
        Some(detail) => Err(TransferError::VerificationFailed {
            src: src.to_path_buf(),
            target: target.to_path_buf(),
            detail,
        }),
    }
}

/// Remove a file, symlink or whole directory tree. Links are removed, never
/// followed.
pub fn remove_tree(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    let ft = meta.file_type();
    if ft.is_dir() {
        fs::remove_dir_all(path)
    } else if ft.is_symlink() {
        // Directory links on Windows need remove_dir.
        fs::remove_file(path).or_else(|e| if cfg!(windows) { fs::remove_dir(path) } else { Err(e) })
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_count_files_dirs_and_bytes() {
        let td = tempfile::tempdir().unwrap();
        let root = td.path().join("t");
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("a"), b"12345").unwrap();
        fs::write(root.join("sub/b"), b"123").unwrap();
        let s = tree_stats(&root).unwrap();
        assert_eq!(s, TreeStats { files: 2, dirs: 2, symlinks: 0, bytes: 8 });
    }

    #[test]
    fn mismatch_reports_detail() {
        let td = tempfile::tempdir().unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        fs::write(&a, b"abc").unwrap();
        fs::write(&b, b"ab").unwrap();
        match verify_copy(&a, &b) {
            Err(TransferError::VerificationFailed { detail, .. }) => assert!(detail.contains("bytes 3 vs 2")),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn remove_tree_does_not_follow_links() {
        let td = tempfile::tempdir().unwrap();
        let keep = td.path().join("keep");
        fs::create_dir(&keep).unwrap();
        fs::write(keep.join("f"), b"x").unwrap();
        let link = td.path().join("link");
        std::os::unix::fs::symlink(&keep, &link).unwrap();
        remove_tree(&link).unwrap();
        assert!(keep.join("f").exists());
        assert!(fs::symlink_metadata(&link).is_err());
    }
}
