//! Self-containment guard: refuses to paste a directory into itself or into
//! one of its descendants.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Real location to compare for the destination: the canonical destination
/// when it resolves, otherwise its canonical parent.
fn resolve_destination(destination: &Path) -> io::Result<PathBuf> {
    match dunce::canonicalize(destination) {
        Ok(p) => Ok(p),
        Err(e) if e.kind() == io::ErrorKind::NotFound => match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => dunce::canonicalize(parent),
            _ => Err(e),
        },
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn same_filesystem(a: &Path, b: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(fs::metadata(a)?.dev() == fs::metadata(b)?.dev())
}

#[cfg(not(unix))]
fn same_filesystem(a: &Path, b: &Path) -> io::Result<bool> {
    // Compare the drive/volume prefix.
    let root = |p: &Path| p.components().next().map(|c| c.as_os_str().to_ascii_lowercase());
    Ok(root(a) == root(b))
}

/// True when `destination` is `source_dir` itself or lies beneath it.
///
/// Both paths are compared in canonical form, so links leading into the
/// source tree are caught too. Paths on different filesystems never contain
/// each other.
pub fn is_self_containment(source_dir: &Path, destination: &Path) -> io::Result<bool> {
    let source_real = dunce::canonicalize(source_dir)?;
    let dest_real = resolve_destination(destination)?;

    if !same_filesystem(&source_real, &dest_real)? {
        debug!(source = %source_real.display(), dest = %dest_real.display(), "containment: different filesystems");
        return Ok(false);
    }
    Ok(dest_real.starts_with(&source_real))
}
