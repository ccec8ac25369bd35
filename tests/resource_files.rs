use assert_fs::prelude::*;
use std::fs;
use std::path::PathBuf;

use explorer_core::resource::{DirectoryHistory, FavoriteEntry, FavoritesFile, HistoryFile, ResourceFile};

#[test]
fn favorites_file_reads_name_path_lines() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("favorites.txt");
    fs::write(&path, "home=/home/me\n\nbroken\n  music=/srv/music  \nwith=eq=/x\n").unwrap();

    let favs = FavoritesFile::new(&path).read(&Vec::new()).unwrap();
    assert_eq!(
        favs,
        vec![
            FavoriteEntry::new("home", "/home/me"),
            FavoriteEntry::new("music", "/srv/music"),
            FavoriteEntry::new("with", "eq=/x"),
        ]
    );
}

#[test]
fn favorites_file_writes_one_entry_per_line() {
    let td = assert_fs::TempDir::new().unwrap();
    let child = td.child("nested/favorites.txt");
    let file = FavoritesFile::new(child.path());

    assert!(file.write(&vec![FavoriteEntry::new("a", "/x/a"), FavoriteEntry::new("b", "/y")]));
    child.assert("a=/x/a\nb=/y\n");
    assert!(file.last_modified().is_some());
}

#[test]
fn unreadable_favorites_keep_the_cache() {
    let td = tempfile::tempdir().unwrap();
    let file = FavoritesFile::new(td.path());
    assert!(file.read(&Vec::new()).is_none());
    assert!(file.last_modified().is_none());
    assert!(!file.write(&Vec::new()));
}

#[test]
fn history_file_keeps_most_recent_entries_oldest_first() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("directories_accessed.txt");
    let file = HistoryFile::new(&path, 100);

    let mut history = DirectoryHistory::default();
    for i in 0..150 {
        history.notify(&PathBuf::from(format!("/d/{i}")));
    }
    assert!(file.write(&history));

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 100);
    assert_eq!(lines.first(), Some(&"/d/50"));
    assert_eq!(lines.last(), Some(&"/d/149"));
}

#[test]
fn history_file_read_starts_counts_at_one() {
    let td = assert_fs::TempDir::new().unwrap();
    let file = td.child("directories_accessed.txt");
    file.write_str("/a\n\n/b\n").unwrap();

    let history = HistoryFile::new(file.path(), 100).read(&DirectoryHistory::default()).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.entries().iter().all(|e| e.access_count == 1));
    assert_eq!(history.sorted_by_access_time(10), vec![PathBuf::from("/b"), PathBuf::from("/a")]);
}
