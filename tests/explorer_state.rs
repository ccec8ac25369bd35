use std::fs;
use std::path::Path;

use explorer_core::{ExplorerPersistentState, StorageManager};

#[test]
fn state_file_stores_selection_relative_to_current_dir() {
    let td = tempfile::tempdir().unwrap();
    let store = td.path().join("store");
    let sm = StorageManager::new(&store);
    let cwd = td.path().join("work");

    sm.write_state(&ExplorerPersistentState::new(&cwd, Some(cwd.join("docs/readme.md"))))
        .unwrap();

    let text = fs::read_to_string(store.join("explorer_state.txt")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("currentDir="));
    assert!(lines[0].ends_with("work"));
    assert_eq!(lines[1], "selectedFile=docs/readme.md");
    assert_eq!(fs::read_to_string(store.join("version.txt")).unwrap(), "1.0");

    let back = sm.read_state(Path::new("/unused"));
    assert_eq!(back.current_dir, cwd);
    assert_eq!(back.selected_path, Some(cwd.join("docs").join("readme.md")));
}

#[test]
fn selection_outside_current_dir_is_dropped() {
    let td = tempfile::tempdir().unwrap();
    let sm = StorageManager::new(td.path());
    let cwd = td.path().join("work");

    sm.write_state(&ExplorerPersistentState::new(&cwd, Some(td.path().join("elsewhere.txt"))))
        .unwrap();
    let text = fs::read_to_string(sm.state_path()).unwrap();
    assert!(text.ends_with("selectedFile=\n"));
    assert_eq!(sm.read_state(Path::new("/unused")).selected_path, None);
}

#[test]
fn unknown_keys_and_missing_current_dir_fall_back() {
    let td = tempfile::tempdir().unwrap();
    let sm = StorageManager::new(td.path());
    fs::write(sm.state_path(), "selectedFile=a.txt\ntheme=dark\n").unwrap();

    let st = sm.read_state(Path::new("/fallback"));
    assert_eq!(st.current_dir, Path::new("/fallback"));
    assert_eq!(st.selected_path, Some(Path::new("/fallback").join("a.txt")));
}
