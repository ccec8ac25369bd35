use std::fs;
use std::path::{Path, PathBuf};

use explorer_core::transfer::{CollisionPolicy, ErrorSolution, ItemState, TransferBatch, TransferOptions};

fn fixture(root: &Path) -> (Vec<PathBuf>, PathBuf) {
    let src = root.join("src");
    let dst = root.join("dst");
    fs::create_dir_all(&src).unwrap();
    fs::create_dir_all(&dst).unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(src.join(name), name).unwrap();
    }
    fs::write(dst.join("a.txt"), "existing").unwrap();
    fs::write(dst.join("b.txt"), "existing").unwrap();
    let sources = ["a.txt", "b.txt", "c.txt"].iter().map(|n| src.join(n)).collect();
    (sources, dst)
}

fn later_batch(root: &Path) -> TransferBatch {
    let (sources, dst) = fixture(root);
    TransferBatch::new(sources, dst, false, CollisionPolicy::ResolveLater, TransferOptions::default()).unwrap()
}

#[test]
fn retry_with_policy_override_completes_the_batch() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    assert!(!batch.execute());
    assert_eq!(batch.failed_items().count(), 2);

    for item in batch.failed_items_mut() {
        item.set_policy_override(Some(CollisionPolicy::CreateSibling));
        assert!(item.set_error_solution(ErrorSolution::Retry));
    }
    assert!(batch.execute());

    let dst = td.path().join("dst");
    assert_eq!(fs::read_to_string(dst.join("a_copy0.txt")).unwrap(), "a.txt");
    assert_eq!(fs::read_to_string(dst.join("b_copy0.txt")).unwrap(), "b.txt");
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "existing");
    assert!(batch.items().iter().all(|i| i.state() == ItemState::Done));
    assert!(batch.items().iter().all(|i| i.last_error().is_none()));
}

#[test]
fn retry_without_change_fails_again() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    batch.execute();

    let item = batch.item_mut(0).unwrap();
    item.set_error_solution(ErrorSolution::Retry);
    assert!(!batch.execute());
    let a = &batch.items()[0];
    assert!(a.did_fail());
    assert_eq!(a.error_solution(), None);
}

#[test]
fn changing_the_default_policy_applies_to_retried_items() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    batch.execute();

    batch.set_default_policy(CollisionPolicy::MarkResolved);
    for item in batch.failed_items_mut() {
        item.set_error_solution(ErrorSolution::Retry);
    }
    assert!(batch.execute());
    assert!(!td.path().join("dst/a_copy0.txt").exists());
}

#[test]
fn skip_marks_item_done_without_copying() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    batch.execute();

    for item in batch.failed_items_mut() {
        item.set_error_solution(ErrorSolution::Skip);
    }
    assert!(batch.execute());
    assert!(batch.items()[0].copied().is_none());
    assert!(batch.items()[2].copied().is_some());
    assert_eq!(fs::read_to_string(td.path().join("dst/b.txt")).unwrap(), "existing");
}

#[test]
fn cancel_stops_the_batch_for_good() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    batch.execute();

    batch.item_mut(0).unwrap().set_error_solution(ErrorSolution::Cancel);
    assert!(!batch.execute());
    assert!(batch.is_cancelled());

    // b was never reached again; later solutions do not revive the batch.
    batch.item_mut(1).unwrap().set_error_solution(ErrorSolution::Skip);
    assert!(!batch.execute());
    assert!(batch.items()[1].did_fail());

    let report = batch.report();
    assert!(report.cancelled);
    assert!(report.summary().starts_with("Paste cancelled"));
}

#[test]
fn solution_is_only_accepted_for_failed_items() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    // Not run yet.
    assert!(!batch.item_mut(2).unwrap().set_error_solution(ErrorSolution::Retry));

    batch.execute();
    let c = batch.item_mut(2).unwrap();
    assert!(c.is_done());
    assert!(!c.set_error_solution(ErrorSolution::Skip));
}

#[test]
fn retry_detects_collisions_again_with_the_original_name() {
    let td = tempfile::tempdir().unwrap();
    let mut batch = later_batch(td.path());
    batch.execute();

    let dst = td.path().join("dst");
    fs::remove_file(dst.join("a.txt")).unwrap();
    batch.item_mut(0).unwrap().set_error_solution(ErrorSolution::Retry);
    batch.execute();

    let a = &batch.items()[0];
    assert!(a.is_done());
    assert_eq!(a.actual_target(), dst.join("a.txt"));
    assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a.txt");
    assert!(!dst.join("a_copy0.txt").exists());
    // b still collides and keeps waiting.
    assert!(batch.items()[1].did_fail());
}
