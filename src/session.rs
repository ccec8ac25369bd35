//! Explorer session: owns the cached favorites and directory history for
//! the lifetime of the process.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::SessionError;
use crate::resource::{
    CachedResource, DirectoryHistory, ExplorerPersistentState, FavoriteEntry, FavoritesFile, HistoryFile,
    StorageManager,
};

pub struct Session {
    storage: StorageManager,
    favorites: CachedResource<Vec<FavoriteEntry>, FavoritesFile>,
    history: CachedResource<DirectoryHistory, HistoryFile>,
    history_limit: usize,
}

impl Session {
    pub fn open(storage: StorageManager, history_limit: usize) -> Self {
        let favorites = CachedResource::new(storage.favorites_file(), Vec::new());
        let history = CachedResource::new(storage.history_file(history_limit), DirectoryHistory::default());
        Self { storage, favorites, history, history_limit }
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub fn favorites(&mut self) -> &[FavoriteEntry] {
        self.favorites.read_and_get()
    }

    /// Add a favorite. Names are trimmed, and must be unique, non-empty and
    /// free of `=` and line breaks so the favorites file stays parseable.
    pub fn add_favorite(&mut self, name: &str, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let name = name.trim();
        if name.is_empty() || name.contains(['=', '\n', '\r']) {
            return Err(SessionError::InvalidFavoriteName);
        }
        let entry = FavoriteEntry::new(name, path);
        let current = self.favorites.read_and_get();
        if current.iter().any(|f| f.name == entry.name) {
            debug!(name = %entry.name, "favorites: duplicate name rejected");
            return Err(SessionError::DuplicateFavorite(entry.name));
        }
        debug!(name = %entry.name, path = %entry.path.display(), "favorites: adding");
        let mut updated = current.clone();
        updated.push(entry);
        self.favorites.set_and_write(updated);
        Ok(())
    }

    /// Add `dir` under its own last path component.
    pub fn add_current_dir_favorite(&mut self, dir: &Path) -> Result<(), SessionError> {
        let Some(name) = dir.file_name() else {
            return Err(SessionError::UnnamedDirectory(dir.to_path_buf()));
        };
        let name = name.to_string_lossy().into_owned();
        self.add_favorite(&name, dir)
    }

    /// Returns false when no favorite has that name.
    pub fn remove_favorite(&mut self, name: &str) -> bool {
        let current = self.favorites.read_and_get();
        if !current.iter().any(|f| f.name == name) {
            return false;
        }
        let updated: Vec<FavoriteEntry> = current.iter().filter(|f| f.name != name).cloned().collect();
        self.favorites.set_and_write(updated);
        true
    }

    /// Record that the user entered `dir`. Returns whether the history file
    /// was written.
    pub fn record_directory_access(&mut self, dir: &Path) -> bool {
        let limit = self.history_limit;
        self.history.read_and_write(|h| {
            h.notify(dir);
            h.retain_recent(limit);
        })
    }

    pub fn recent_by_access_time(&mut self, max: usize) -> Vec<PathBuf> {
        self.history.read_and_get().sorted_by_access_time(max)
    }

    pub fn recent_by_access_count(&mut self, max: usize) -> Vec<PathBuf> {
        self.history.read_and_get().sorted_by_access_count(max)
    }

    pub fn load_state(&self, default_dir: &Path) -> ExplorerPersistentState {
        self.storage.read_state(default_dir)
    }

    pub fn save_state(&self, state: &ExplorerPersistentState) -> io::Result<()> {
        self.storage.write_state(state)
    }
}
