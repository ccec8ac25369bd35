//! Layout of the storage directory.
//!
//! ```text
//! <storage_dir>/
//!   favorites.txt             name=portable/path
//!   directories_accessed.txt  portable/path (oldest first)
//!   explorer_state.txt        currentDir=... / selectedFile=...
//!   version.txt               1.0
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::favorites::FavoritesFile;
use super::history::HistoryFile;
use super::lines::{parse_key_value_lines, read_lines_if_regular, to_portable};
use super::state::ExplorerPersistentState;
use crate::fs_ops::helpers::io_error_with_help_io;

pub const FAVORITES_FILE: &str = "favorites.txt";
pub const HISTORY_FILE: &str = "directories_accessed.txt";
pub const STATE_FILE: &str = "explorer_state.txt";
pub const VERSION_FILE: &str = "version.txt";
pub const STORAGE_VERSION: &str = "1.0";

pub const KEY_CURRENT_DIR: &str = "currentDir";
pub const KEY_SELECTED_FILE: &str = "selectedFile";

#[derive(Debug, Clone)]
pub struct StorageManager {
    storage_dir: PathBuf,
}

impl StorageManager {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self { storage_dir: storage_dir.into() }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn favorites_file(&self) -> FavoritesFile {
        FavoritesFile::new(self.storage_dir.join(FAVORITES_FILE))
    }

    pub fn history_file(&self, limit: usize) -> HistoryFile {
        HistoryFile::new(self.storage_dir.join(HISTORY_FILE), limit)
    }

    pub fn state_path(&self) -> PathBuf {
        self.storage_dir.join(STATE_FILE)
    }

    /// Load the explorer state. A missing or unreadable file yields
    /// `default_dir` with no selection.
    pub fn read_state(&self, default_dir: &Path) -> ExplorerPersistentState {
        let path = self.state_path();
        let Some(lines) = read_lines_if_regular(&path) else {
            info!(path = %path.display(), "state file missing or not a regular file, using defaults");
            return ExplorerPersistentState::new(default_dir, None);
        };

        let mut current_dir = None;
        let mut selected = None;
        for (key, value) in parse_key_value_lines(lines.iter().map(String::as_str)) {
            let Some(value) = value.filter(|v| !v.is_empty()) else {
                continue;
            };
            match key.as_str() {
                KEY_CURRENT_DIR => current_dir = Some(PathBuf::from(value)),
                KEY_SELECTED_FILE => selected = Some(value),
                other => debug!(key = other, "state: unknown key ignored"),
            }
        }

        let current_dir = current_dir.unwrap_or_else(|| default_dir.to_path_buf());
        let selected_path = selected.map(|s| current_dir.join(s));
        ExplorerPersistentState::new(current_dir, selected_path)
    }

    /// Persist the explorer state and the storage version marker.
    ///
    /// The selection is stored relative to the current directory; a selection
    /// outside of it is dropped.
    pub fn write_state(&self, state: &ExplorerPersistentState) -> io::Result<()> {
        fs::create_dir_all(&self.storage_dir).map_err(io_error_with_help_io("create storage dir", &self.storage_dir))?;

        let version = self.storage_dir.join(VERSION_FILE);
        fs::write(&version, STORAGE_VERSION).map_err(io_error_with_help_io("write version file", &version))?;

        let current_dir = std::path::absolute(&state.current_dir)?;
        let selected = match &state.selected_path {
            Some(sel) => {
                let sel = std::path::absolute(sel)?;
                sel.strip_prefix(&current_dir).map(to_portable).unwrap_or_default()
            }
            None => String::new(),
        };

        let path = self.state_path();
        let text = format!(
            "{KEY_CURRENT_DIR}={}\n{KEY_SELECTED_FILE}={}\n",
            to_portable(&current_dir),
            selected
        );
        fs::write(&path, text).map_err(io_error_with_help_io("write state file", &path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_state_uses_default_dir() {
        let td = tempfile::tempdir().unwrap();
        let sm = StorageManager::new(td.path().join("store"));
        let st = sm.read_state(Path::new("/home/someone"));
        assert_eq!(st, ExplorerPersistentState::new("/home/someone", None));
    }

    #[test]
    fn empty_selection_reads_as_none() {
        let td = tempfile::tempdir().unwrap();
        let sm = StorageManager::new(td.path());
        fs::write(sm.state_path(), "currentDir=/srv/data\nselectedFile=\n").unwrap();
        let st = sm.read_state(Path::new("/fallback"));
        assert_eq!(st.current_dir, PathBuf::from("/srv/data"));
        assert_eq!(st.selected_path, None);
    }
}
