//! Default path helpers and symlink checks.

use dirs::{config_dir, data_dir};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "EXPLORER_CONFIG";

const APP_DIR: &str = "explorer_core";

fn home_fallback(parts: &[&str]) -> Option<PathBuf> {
    env::var_os("HOME").map(|h| parts.iter().fold(PathBuf::from(h), |acc, p| acc.join(p)))
}

/// `$EXPLORER_CONFIG` if set, else the OS config dir.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os(CONFIG_ENV)
        && !p.is_empty()
    {
        return Some(PathBuf::from(p));
    }
    match config_dir() {
        Some(base) => Some(base.join(APP_DIR).join("config.xml")),
        None => home_fallback(&[".config", APP_DIR, "config.xml"]),
    }
}

/// OS data dir for favorites, history and state.
pub fn default_storage_dir() -> PathBuf {
    data_dir()
        .map(|base| base.join(APP_DIR))
        .or_else(|| home_fallback(&[".local", "share", APP_DIR]))
        .unwrap_or_else(|| PathBuf::from(APP_DIR))
}

/// Suggested log file location (not created).
pub fn default_log_path() -> Option<PathBuf> {
    data_dir()
        .map(|base| base.join(APP_DIR))
        .or_else(|| home_fallback(&[".local", "share", APP_DIR]))
        .map(|dir| dir.join("explorer.log"))
}

/// Return true if any existing ancestor of `path` is a symlink.
pub fn path_has_symlink_ancestor(path: &Path) -> io::Result<bool> {
    for anc in path.ancestors().skip(1) {
        if anc.as_os_str().is_empty() {
            continue;
        }
        match fs::symlink_metadata(anc) {
            Ok(meta) if meta.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(false)
}
