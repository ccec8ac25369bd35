//! Favorites file: one `name=path` line per favorite.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use super::cached::ResourceFile;
use super::lines::{modified_if_regular, parse_key_value_lines, read_lines_if_regular, to_portable, write_lines};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteEntry {
    pub name: String,
    pub path: PathBuf,
}

impl FavoriteEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { name: name.into(), path: path.into() }
    }
}

#[derive(Debug, Clone)]
pub struct FavoritesFile {
    path: PathBuf,
}

impl FavoritesFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResourceFile<Vec<FavoriteEntry>> for FavoritesFile {
    fn read(&self, _prior: &Vec<FavoriteEntry>) -> Option<Vec<FavoriteEntry>> {
        let lines = read_lines_if_regular(&self.path)?;
        let favorites = parse_key_value_lines(lines.iter().map(String::as_str))
            .into_iter()
            .filter_map(|(name, value)| value.map(|v| FavoriteEntry::new(name, v)))
            .collect();
        Some(favorites)
    }

    fn write(&self, value: &Vec<FavoriteEntry>) -> bool {
        write_lines(&self.path, value.iter().map(|f| format!("{}={}", f.name, to_portable(&f.path))))
    }

    fn last_modified(&self) -> Option<SystemTime> {
        modified_if_regular(&self.path)
    }

    fn name(&self) -> &str {
        "favorites"
    }
}
