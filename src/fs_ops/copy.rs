//! Recursive copy into a fresh target.
//!
//! - Regular files are written with `create_new`, so a target that appears
//!   between collision detection and the copy is an error, never clobbered.
//! - Directories are created with `create_dir`; an existing directory at the
//!   top-level target is an error as well.
//! - Symlinks are recreated as links; they are never followed.
//! - On failure the partially written target is removed (best effort).

use filetime::FileTime;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::helpers::transfer_io;
use super::verify::{TreeStats, remove_tree};
use crate::errors::TransferError;

const BUF_SIZE: usize = 1024 * 1024;

/// Copy `src` to `dst` (which must not exist yet) and return what was copied.
pub fn copy_tree(src: &Path, dst: &Path, preserve_timestamps: bool) -> Result<TreeStats, TransferError> {
    let mut stats = TreeStats::default();
    let mut created_root = false;
    let res = copy_tree_inner(src, dst, preserve_timestamps, &mut stats, &mut created_root);
    if let Err(e) = &res
        && created_root
    {
        if let Err(cleanup) = remove_tree(dst) {
            warn!(dest = %dst.display(), error = %cleanup, "copy: failed to remove partial copy");
        } else {
            debug!(dest = %dst.display(), error = %e, "copy: removed partial copy after failure");
        }
    }
    res.map(|()| stats)
}

fn copy_tree_inner(
    src: &Path,
    dst: &Path,
    preserve_timestamps: bool,
    stats: &mut TreeStats,
    created_root: &mut bool,
) -> Result<(), TransferError> {
    let meta = fs::symlink_metadata(src).map_err(transfer_io("stat source", src))?;
    let ft = meta.file_type();

    if !ft.is_dir() {
        copy_entry(src, dst, &meta, preserve_timestamps, created_root)?;
        stats.record(ft, meta.len());
        return Ok(());
    }

    fs::create_dir(dst).map_err(transfer_io("create directory", dst))?;
    *created_root = true;
    stats.record(ft, 0);

    // Directory metadata is applied after the contents are written.
    let mut dirs: Vec<(PathBuf, fs::Metadata)> = vec![(dst.to_path_buf(), meta)];

    for entry in WalkDir::new(src).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            let io_err = io::Error::from(e);
            transfer_io("walk source", &path)(io_err)
        })?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        let entry_meta = entry.metadata().map_err(|e| {
            let io_err = io::Error::from(e);
            transfer_io("stat source", entry.path())(io_err)
        })?;
        let eft = entry.file_type();

        if eft.is_dir() {
            fs::create_dir(&target).map_err(transfer_io("create directory", &target))?;
            stats.record(eft, 0);
            dirs.push((target, entry_meta));
        } else {
            // Cleanup of the root covers entries below it.
            copy_entry(entry.path(), &target, &entry_meta, preserve_timestamps, &mut false)?;
            stats.record(eft, entry_meta.len());
        }
    }

    for (dir, dir_meta) in dirs.iter().rev() {
        if preserve_timestamps {
            apply_times(dir, dir_meta)?;
        }
        fs::set_permissions(dir, dir_meta.permissions()).map_err(transfer_io("set permissions", dir))?;
    }
    Ok(())
}

/// Copy a single non-directory entry (regular file or symlink). `created`
/// is set as soon as `dst` exists, even if filling it fails afterwards.
fn copy_entry(
    src: &Path,
    dst: &Path,
    meta: &fs::Metadata,
    preserve_timestamps: bool,
    created: &mut bool,
) -> Result<(), TransferError> {
    if meta.file_type().is_symlink() {
        copy_symlink(src, dst)?;
        *created = true;
        return Ok(());
    }
    copy_file(src, dst, created).map_err(transfer_io("copy file", dst))?;
    fs::set_permissions(dst, meta.permissions()).map_err(transfer_io("set permissions", dst))?;
    if preserve_timestamps {
        apply_times(dst, meta)?;
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path, created: &mut bool) -> io::Result<u64> {
    let src_f = File::open(src)?;
    let dst_f = OpenOptions::new().write(true).create_new(true).open(dst)?;
    *created = true;
    let mut reader = BufReader::with_capacity(BUF_SIZE, src_f);
    let mut writer = BufWriter::with_capacity(BUF_SIZE, dst_f);
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

fn apply_times(path: &Path, meta: &fs::Metadata) -> Result<(), TransferError> {
    let atime = FileTime::from_last_access_time(meta);
    let mtime = FileTime::from_last_modification_time(meta);
    filetime::set_file_times(path, atime, mtime).map_err(transfer_io("set timestamps", path))
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), TransferError> {
    let link = fs::read_link(src).map_err(transfer_io("read symlink", src))?;
    std::os::unix::fs::symlink(&link, dst).map_err(transfer_io("create symlink", dst))
}

#[cfg(windows)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), TransferError> {
    use std::os::windows::fs::{symlink_dir, symlink_file};
    let link = fs::read_link(src).map_err(transfer_io("read symlink", src))?;
    let points_to_dir = fs::metadata(src).map(|m| m.is_dir()).unwrap_or(false);
    let res = if points_to_dir { symlink_dir(&link, dst) } else { symlink_file(&link, dst) };
    res.map_err(transfer_io("create symlink", dst))
}
