//! Line-oriented file helpers shared by the resource files.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::SystemTime;
use tracing::{debug, warn};

use crate::fs_ops::describe_io_error;

/// Parse `key=value` lines.
///
/// - Lines are trimmed; blank lines and lines with an empty key are skipped.
/// - A line without `=` yields a `None` value.
/// - A repeated key overwrites the earlier value but keeps its position.
pub fn parse_key_value_lines<'a, I>(lines: I) -> Vec<(String, Option<String>)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out: Vec<(String, Option<String>)> = Vec::new();
    for (i, raw) in lines.into_iter().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = match line.split_once('=') {
            Some((k, v)) => (k, Some(v.to_string())),
            None => (line, None),
        };
        if key.trim().is_empty() {
            debug!(line = i, "key-value: empty key, line skipped");
            continue;
        }
        match out.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value,
            None => out.push((key.to_string(), value)),
        }
    }
    out
}

/// Path string with `/` separators on every platform.
pub fn to_portable(path: &Path) -> String {
    let s = path.to_string_lossy();
    if cfg!(windows) { s.replace('\\', "/") } else { s.into_owned() }
}

/// Modification time of `path` if it is a regular file.
pub fn modified_if_regular(path: &Path) -> Option<SystemTime> {
    let meta = fs::metadata(path).ok()?;
    if !meta.is_file() {
        return None;
    }
    meta.modified().ok()
}

/// All lines of `path`, or `None` when it is not a readable regular file.
pub fn read_lines_if_regular(path: &Path) -> Option<Vec<String>> {
    if !fs::metadata(path).is_ok_and(|m| m.is_file()) {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(text.lines().map(str::to_string).collect()),
        Err(e) => {
            warn!("{}", describe_io_error("read resource file", path, &e));
            None
        }
    }
}

/// Make sure `path` exists as a regular file, creating parents as needed.
/// Returns false when something other than a regular file occupies it.
pub fn ensure_regular_file(path: &Path) -> io::Result<bool> {
    if !path.exists() {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        File::create(path)?;
    }
    Ok(fs::metadata(path)?.is_file())
}

/// Replace the contents of `path` with `lines`, one per line.
pub fn write_lines<I, S>(path: &Path, lines: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match ensure_regular_file(path) {
        Ok(true) => {}
        Ok(false) => {
            warn!(path = %path.display(), "resource file path is not a regular file");
            return false;
        }
        Err(e) => {
            warn!("{}", describe_io_error("create resource file", path, &e));
            return false;
        }
    }

    let res = (|| -> io::Result<()> {
        let mut w = BufWriter::new(File::create(path)?);
        for line in lines {
            w.write_all(line.as_ref().as_bytes())?;
            w.write_all(b"\n")?;
        }
        w.flush()
    })();
    if let Err(e) = res {
        warn!("{}", describe_io_error("write resource file", path, &e));
        return false;
    }
    true
}
