//! Sibling-name generation for the CreateSibling collision policy.
//!
//! Names follow `stem_copyN.ext` with N counting from 0:
//! - "a.txt"          -> "a_copy0.txt", "a_copy1.txt", ...
//! - "Makefile"       -> "Makefile_copy0"
//! - ".env"           -> ".env_copy0"
//! - "archive.tar.gz" -> "archive.tar_copy0.gz"
//!
//! The search is bounded; callers treat `Ok(None)` as exhaustion.

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

use super::helpers::path_exists;

/// Default cap on sibling candidates probed for a single item.
pub const DEFAULT_MAX_SIBLING_ATTEMPTS: u32 = 10_000;

#[cfg(windows)]
const MAX_FILENAME_LEN: usize = 240;
#[cfg(not(windows))]
const MAX_FILENAME_LEN: usize = 255;

#[cfg(unix)]
fn name_len_units(s: &OsStr) -> usize {
    use std::os::unix::ffi::OsStrExt;
    s.as_bytes().len()
}

#[cfg(not(unix))]
fn name_len_units(s: &OsStr) -> usize {
    s.to_string_lossy().len()
}

/// Shrink `stem` so that `stem + overhead` fits the filename budget.
fn fit_stem(stem: &OsStr, overhead: usize) -> OsString {
    if name_len_units(stem) + overhead <= MAX_FILENAME_LEN {
        return stem.to_os_string();
    }
    let budget = MAX_FILENAME_LEN.saturating_sub(overhead).max(1);
    let lossy = stem.to_string_lossy();
    let mut acc = String::new();
    for ch in lossy.chars() {
        if acc.len() + ch.len_utf8() > budget {
            break;
        }
        acc.push(ch);
    }
    if acc.is_empty() {
        acc.push('f');
    }
    OsString::from(acc)
}

/// File name of the `n`-th sibling candidate for `original`.
pub fn sibling_name(original: &OsStr, n: u32) -> OsString {
    let as_path = Path::new(original);
    let stem = as_path.file_stem().unwrap_or(original);
    let ext = as_path.extension();

    let suffix = format!("_copy{n}");
    let mut overhead = suffix.len();
    if let Some(e) = ext {
        overhead += 1 + name_len_units(e);
    }

    let mut name = fit_stem(stem, overhead);
    name.push(&suffix);
    if let Some(e) = ext {
        name.push(".");
        name.push(e);
    }
    name
}

/// First sibling of `original` (a full path) that does not exist yet, probing
/// at most `max_attempts` candidates.
pub fn next_free_sibling(original: &Path, max_attempts: u32) -> io::Result<Option<PathBuf>> {
    let Some(name) = original.file_name() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no file name", original.display()),
        ));
    };
    let dir = original.parent().unwrap_or_else(|| Path::new(""));

    for n in 0..max_attempts {
        let candidate = dir.join(sibling_name(name, n));
        if !path_exists(&candidate)? {
            return Ok(Some(candidate));
        }
        if n == 2 {
            trace!(name = ?name, dir = %dir.display(), "sibling: multiple collisions, continuing search");
        }
    }
    Ok(None)
}
