use assert_cmd::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

/// `explorer` with an absent config file and storage under `root`.
fn explorer(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("explorer"));
    cmd.env("EXPLORER_CONFIG", root.join("no-config.xml"));
    cmd.arg("--storage-dir").arg(root.join("store"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let out = cmd.output().unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    String::from_utf8_lossy(&out.stdout).into_owned()
}

#[test]
fn paste_copies_and_reports() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("dst")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("dst/a.txt"), "old").unwrap();

    let stdout = stdout_of(explorer(root).arg("paste").arg(root.join("a.txt")).arg(root.join("dst")));
    assert!(stdout.contains("a_copy0.txt"));
    assert!(stdout.contains("Paste complete: 1 of 1 done"));
    assert_eq!(fs::read_to_string(root.join("dst/a_copy0.txt")).unwrap(), "a");
}

#[test]
fn paste_with_unresolved_collision_exits_nonzero() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("dst")).unwrap();
    fs::write(root.join("a.txt"), "a").unwrap();
    fs::write(root.join("dst/a.txt"), "old").unwrap();

    let out = explorer(root)
        .args(["paste", "--collision", "later"])
        .arg(root.join("a.txt"))
        .arg(root.join("dst"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Paste incomplete"));

    // Skipping the failed item finishes the batch.
    explorer(root)
        .args(["paste", "--collision", "later", "--on-error", "skip"])
        .arg(root.join("a.txt"))
        .arg(root.join("dst"))
        .assert()
        .success();
    assert_eq!(fs::read_to_string(root.join("dst/a.txt")).unwrap(), "old");
}

#[test]
fn paste_move_removes_source() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("dst")).unwrap();
    fs::create_dir_all(root.join("tree")).unwrap();
    fs::write(root.join("tree/f.txt"), "f").unwrap();

    explorer(root)
        .args(["paste", "--move"])
        .arg(root.join("tree"))
        .arg(root.join("dst"))
        .assert()
        .success();
    assert!(!root.join("tree").exists());
    assert!(root.join("dst/tree/f.txt").exists());
}

#[test]
fn paste_into_itself_is_rejected() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    fs::create_dir_all(root.join("proj/sub")).unwrap();

    explorer(root)
        .arg("paste")
        .arg(root.join("proj"))
        .arg(root.join("proj/sub"))
        .assert()
        .failure();
    assert!(!root.join("proj/sub/proj").exists());
}

#[test]
fn favorites_add_list_remove() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    let docs = root.join("docs");
    fs::create_dir_all(&docs).unwrap();

    explorer(root).args(["favorites", "add", "docs"]).arg(&docs).assert().success();
    explorer(root).args(["favorites", "add", "docs"]).arg(&docs).assert().failure();

    let listed = stdout_of(explorer(root).arg("favorites"));
    assert!(listed.starts_with("docs\t"));
    assert!(fs::read_to_string(root.join("store/favorites.txt")).unwrap().starts_with("docs="));

    explorer(root).args(["favorites", "remove", "docs"]).assert().success();
    explorer(root).args(["favorites", "remove", "docs"]).assert().failure();
    assert!(stdout_of(explorer(root).args(["favorites", "list"])).trim().is_empty());
}

#[test]
fn visit_then_recent() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    let a = root.join("a");
    let b = root.join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();

    for d in [&a, &b, &a] {
        explorer(root).arg("visit").arg(d).assert().success();
    }
    explorer(root).arg("visit").arg(root.join("missing")).assert().failure();

    let recent = stdout_of(explorer(root).arg("recent"));
    let lines: Vec<&str> = recent.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("a"));
    assert!(lines[1].ends_with("b"));
}

#[test]
fn state_save_and_show() {
    let td = tempfile::tempdir().unwrap();
    let root = td.path();
    let work = root.join("work");
    fs::create_dir_all(&work).unwrap();

    explorer(root)
        .args(["state", "save"])
        .arg(&work)
        .args(["--selected", "notes.md"])
        .assert()
        .success();
    let shown = stdout_of(explorer(root).arg("state"));
    assert!(shown.contains(&format!("currentDir={}", work.display())));
    assert!(shown.contains("notes.md"));
}
