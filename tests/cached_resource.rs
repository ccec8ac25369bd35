use std::cell::{Cell, RefCell};
use std::fs;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use explorer_core::resource::{CacheEvent, CachedResource, FavoriteEntry, FavoritesFile, ResourceFile};

/// Favorites file that counts reads.
struct CountingFile {
    inner: FavoritesFile,
    reads: Rc<Cell<u32>>,
}

impl ResourceFile<Vec<FavoriteEntry>> for CountingFile {
    fn read(&self, prior: &Vec<FavoriteEntry>) -> Option<Vec<FavoriteEntry>> {
        self.reads.set(self.reads.get() + 1);
        self.inner.read(prior)
    }

    fn write(&self, value: &Vec<FavoriteEntry>) -> bool {
        self.inner.write(value)
    }

    fn last_modified(&self) -> Option<SystemTime> {
        self.inner.last_modified()
    }
}

fn bump_mtime(path: &std::path::Path) {
    let later = SystemTime::now() + Duration::from_secs(5);
    filetime::set_file_mtime(path, filetime::FileTime::from_system_time(later)).unwrap();
}

#[test]
fn unchanged_file_is_read_once() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("favorites.txt");
    fs::write(&path, "home=/home/me\n").unwrap();

    let reads = Rc::new(Cell::new(0));
    let file = CountingFile { inner: FavoritesFile::new(&path), reads: Rc::clone(&reads) };
    let mut res = CachedResource::new(file, Vec::new());

    assert_eq!(res.read_and_get().len(), 1);
    assert_eq!(res.read_and_get().len(), 1);
    assert_eq!(res.read_and_get()[0].name, "home");
    assert_eq!(reads.get(), 1);
}

#[test]
fn external_edit_is_picked_up() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("favorites.txt");
    fs::write(&path, "home=/home/me\n").unwrap();

    let mut res = CachedResource::new(FavoritesFile::new(&path), Vec::new());
    assert_eq!(res.read_and_get().len(), 1);

    fs::write(&path, "home=/home/me\nsrc=/srv/src\n").unwrap();
    bump_mtime(&path);
    let names: Vec<_> = res.read_and_get().iter().map(|f| f.name.clone()).collect();
    assert_eq!(names, ["home", "src"]);
}

#[test]
fn failed_write_is_retried_once_the_path_is_usable() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("favorites.txt");
    // A directory squatting on the file path makes every write fail.
    fs::create_dir(&path).unwrap();

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let mut res = CachedResource::new(FavoritesFile::new(&path), Vec::new())
        .with_diagnostics(move |e| sink.borrow_mut().push(*e));

    assert!(!res.set_and_write(vec![FavoriteEntry::new("docs", "/home/me/docs")]));
    assert!(res.has_pending_write());
    // The new value is served from the cache anyway.
    assert_eq!(res.read_and_get().len(), 1);

    fs::remove_dir(&path).unwrap();
    assert_eq!(res.read_and_get()[0].name, "docs");
    assert!(!res.has_pending_write());
    assert_eq!(fs::read_to_string(&path).unwrap(), "docs=/home/me/docs\n");

    let events = events.borrow();
    assert_eq!(events.first(), Some(&CacheEvent::WriteFailed));
    assert_eq!(events.last(), Some(&CacheEvent::WriteRetried { success: true }));
}

#[test]
fn newer_file_wins_over_a_pending_write() {
    let td = tempfile::tempdir().unwrap();
    let path = td.path().join("favorites.txt");
    fs::create_dir(&path).unwrap();

    let mut res = CachedResource::new(FavoritesFile::new(&path), Vec::new());
    assert!(!res.set_and_write(vec![FavoriteEntry::new("mine", "/a")]));

    // Someone else replaces the file after our write failed.
    fs::remove_dir(&path).unwrap();
    fs::write(&path, "theirs=/b\n").unwrap();
    bump_mtime(&path);

    let names: Vec<_> = res.read_and_get().iter().map(|f| f.name.clone()).collect();
    assert_eq!(names, ["theirs"]);
    assert!(!res.has_pending_write());
    assert_eq!(fs::read_to_string(&path).unwrap(), "theirs=/b\n");
}

#[test]
fn missing_file_serves_initial_value() {
    let td = tempfile::tempdir().unwrap();
    let mut res = CachedResource::new(
        FavoritesFile::new(td.path().join("absent.txt")),
        vec![FavoriteEntry::new("seed", "/seed")],
    );
    assert_eq!(res.read_and_get()[0].name, "seed");
    assert!(!res.has_pending_write());
}
