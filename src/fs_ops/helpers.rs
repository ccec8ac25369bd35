//! I/O error helpers.
//!
//! Enriches `io::Error` with the operation, the path and an actionable hint so
//! that item failures shown to the operator say what to fix.
//!
//! Usage:
//!   // inside the transfer engine
//!   fs::create_dir(dir).map_err(transfer_io("create directory", dir))?;
//!
//!   // in functions returning io::Result<_>
//!   File::open(p).map_err(io_error_with_help_io("open file", p))?;

use std::io;
use std::path::Path;

use crate::errors::{BatchError, DeleteError, TransferError};

fn hint_for(e: &io::Error) -> Option<&'static str> {
    #[cfg(unix)]
    if let Some(code) = e.raw_os_error() {
        let hint = match code {
            libc::EACCES | libc::EPERM => Some("permission denied; check ownership and write permissions"),
            libc::EEXIST => Some("already exists; something created the target while pasting"),
            libc::ENOENT => Some("path not found; it may have been moved or deleted"),
            libc::ENOSPC => Some("insufficient space on device"),
            libc::EROFS => Some("read-only filesystem; cannot write here"),
            libc::ELOOP => Some("too many symbolic link levels; possible symlink cycle"),
            libc::ENAMETOOLONG => Some("file name or path too long; shorten path segments"),
            libc::ENOTEMPTY => Some("directory not empty"),
            libc::EMFILE | libc::ENFILE => Some("too many open files; close files or raise limits"),
            _ => None,
        };
        if hint.is_some() {
            return hint;
        }
    }

    match e.kind() {
        io::ErrorKind::PermissionDenied => Some("permission denied; check ownership and write permissions"),
        io::ErrorKind::NotFound => Some("path not found; it may have been moved or deleted"),
        io::ErrorKind::AlreadyExists => Some("already exists; something created the target while pasting"),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Some("busy or timed out; retry later"),
        _ => None,
    }
}

/// Format a human-friendly message with op/path plus a platform-aware hint.
pub fn describe_io_error(op: &str, path: &Path, e: &io::Error) -> String {
    let mut msg = format!("{} '{}': {}", op, path.display(), e);
    if let Some(hint) = hint_for(e) {
        msg.push_str(" (");
        msg.push_str(hint);
        msg.push(')');
    }
    if let Some(code) = e.raw_os_error() {
        msg.push_str(&format!(" [os code: {}]", code));
    }
    msg
}

/// Adapter for transfer code: `.map_err(transfer_io("copy file", &dst))`.
pub fn transfer_io<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> TransferError + 'a {
    move |e: io::Error| TransferError::Io {
        path: path.to_path_buf(),
        message: describe_io_error(op, path, &e),
        source: e,
    }
}

/// Adapter for batch construction.
pub fn batch_io<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> BatchError + 'a {
    move |e: io::Error| BatchError::Io {
        message: describe_io_error(op, path, &e),
        source: e,
    }
}

/// Adapter for path deletion.
pub fn delete_io<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> DeleteError + 'a {
    move |e: io::Error| DeleteError::Io {
        message: describe_io_error(op, path, &e),
        source: e,
    }
}

/// Adapter for io::Result code; keeps the original ErrorKind.
pub fn io_error_with_help_io<'a>(op: &'a str, path: &'a Path) -> impl FnOnce(io::Error) -> io::Error + 'a {
    move |e: io::Error| io::Error::new(e.kind(), describe_io_error(op, path, &e))
}

/// Symlink-aware existence check: a dangling link still occupies its name.
pub fn path_exists(path: &Path) -> io::Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
