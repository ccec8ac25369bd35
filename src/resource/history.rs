//! Recently accessed directories.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::cached::ResourceFile;
use super::lines::{modified_if_regular, read_lines_if_regular, to_portable, write_lines};

/// Number of entries the history file keeps unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryAccessEntry {
    pub path: PathBuf,
    pub access_count: u32,
}

/// Access history ordered oldest first; the last entry is the most recent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryHistory {
    entries: Vec<DirectoryAccessEntry>,
}

impl DirectoryHistory {
    /// Record an access. A known path moves to the end with its count bumped.
    /// Returns true when the path was not known before.
    pub fn notify(&mut self, path: &Path) -> bool {
        match self.entries.iter().position(|e| e.path == path) {
            Some(i) => {
                let mut entry = self.entries.remove(i);
                entry.access_count = entry.access_count.saturating_add(1);
                self.entries.push(entry);
                false
            }
            None => {
                self.entries.push(DirectoryAccessEntry { path: path.to_path_buf(), access_count: 1 });
                true
            }
        }
    }

    /// Append `paths` (oldest first) with an access count of 1 each.
    pub fn set_initial_entries<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.entries
            .extend(paths.into_iter().map(|path| DirectoryAccessEntry { path, access_count: 1 }));
    }

    /// Drop the oldest entries beyond `limit`.
    pub fn retain_recent(&mut self, limit: usize) {
        let excess = self.entries.len().saturating_sub(limit);
        self.entries.drain(..excess);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[DirectoryAccessEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent first.
    pub fn sorted_by_access_time(&self, max: usize) -> Vec<PathBuf> {
        self.entries.iter().rev().take(max).map(|e| e.path.clone()).collect()
    }

    /// Highest count first; equal counts keep most-recent-first order.
    pub fn sorted_by_access_count(&self, max: usize) -> Vec<PathBuf> {
        let mut by_count: Vec<&DirectoryAccessEntry> = self.entries.iter().rev().collect();
        by_count.sort_by(|a, b| b.access_count.cmp(&a.access_count));
        by_count.into_iter().take(max).map(|e| e.path.clone()).collect()
    }
}

/// One portable path per line, oldest first, capped to the `limit` most
/// recent entries on write. Counts are not persisted.
#[derive(Debug, Clone)]
pub struct HistoryFile {
    path: PathBuf,
    limit: usize,
}

impl HistoryFile {
    pub fn new(path: impl Into<PathBuf>, limit: usize) -> Self {
        Self { path: path.into(), limit }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceFile<DirectoryHistory> for HistoryFile {
    fn read(&self, _prior: &DirectoryHistory) -> Option<DirectoryHistory> {
        let lines = read_lines_if_regular(&self.path)?;
        let mut history = DirectoryHistory::default();
        history.set_initial_entries(
            lines
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(PathBuf::from),
        );
        Some(history)
    }

    fn write(&self, value: &DirectoryHistory) -> bool {
        let skip = value.entries.len().saturating_sub(self.limit);
        write_lines(&self.path, value.entries[skip..].iter().map(|e| to_portable(&e.path)))
    }

    fn last_modified(&self) -> Option<SystemTime> {
        modified_if_regular(&self.path)
    }

    fn name(&self) -> &str {
        "directory history"
    }
}
