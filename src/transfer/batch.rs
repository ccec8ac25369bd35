//! A paste request: one destination, many sources.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::item::{Attempt, TransferItem};
use super::options::{ItemContext, TransferOptions};
use super::policy::CollisionPolicy;
use crate::errors::BatchError;
use crate::fs_ops::helpers::batch_io;
use crate::fs_ops::is_self_containment;
use crate::shutdown;

#[derive(Debug)]
pub struct TransferBatch {
    destination_dir: PathBuf,
    delete_sources_on_success: bool,
    default_policy: CollisionPolicy,
    options: TransferOptions,
    items: Vec<TransferItem>,
    done: bool,
    cancelled: bool,
}

/// Counts describing where a batch stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub done: usize,
    pub failed: usize,
    pub pending: usize,
    pub cancelled: bool,
    pub sources_removed: usize,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        let head = if self.cancelled {
            "Paste cancelled"
        } else if self.done == self.total {
            "Paste complete"
        } else {
            "Paste incomplete"
        };
        let mut s = format!(
            "{head}: {} of {} done, {} failed, {} pending",
            self.done, self.total, self.failed, self.pending
        );
        if self.sources_removed > 0 {
            s.push_str(&format!(", {} source(s) removed", self.sources_removed));
        }
        s
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

fn check_destination(destination_dir: &Path) -> Result<(), BatchError> {
    match fs::metadata(destination_dir) {
        Ok(m) if m.is_dir() => Ok(()),
        Ok(_) => Err(BatchError::DestinationNotDirectory(destination_dir.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(BatchError::DestinationMissing(destination_dir.to_path_buf())),
        Err(e) => Err(batch_io("stat destination", destination_dir)(e)),
    }
}

fn check_source(source: &Path, destination_dir: &Path) -> Result<(), BatchError> {
    if source.file_name().is_none() {
        return Err(BatchError::InvalidSource(source.to_path_buf()));
    }
    // Links are pasted as links, so only real directories can contain the destination.
    let is_real_dir = fs::symlink_metadata(source).map(|m| m.is_dir()).unwrap_or(false);
    if is_real_dir
        && is_self_containment(source, destination_dir).map_err(batch_io("check containment", source))?
    {
        return Err(BatchError::SelfContainment {
            src: source.to_path_buf(),
            destination: destination_dir.to_path_buf(),
        });
    }
    Ok(())
}

impl TransferBatch {
    /// Validate the request and build one item per distinct source.
    ///
    /// Duplicate sources are dropped (first occurrence wins). Missing sources
    /// are accepted here and reported per item when the batch runs.
    pub fn new<I, P>(
        sources: I,
        destination_dir: impl Into<PathBuf>,
        delete_sources_on_success: bool,
        default_policy: CollisionPolicy,
        options: TransferOptions,
    ) -> Result<Self, BatchError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let destination_dir = destination_dir.into();
        let mut seen = HashSet::new();
        let sources: Vec<PathBuf> = sources
            .into_iter()
            .map(Into::into)
            .filter(|p: &PathBuf| seen.insert(p.clone()))
            .collect();

        if sources.is_empty() {
            return Err(BatchError::NoSources);
        }
        check_destination(&destination_dir)?;
        for source in &sources {
            check_source(source, &destination_dir)?;
        }

        let items = sources
            .iter()
            .map(|s| TransferItem::new(s, &destination_dir))
            .collect();
        debug!(
            dest = %destination_dir.display(),
            count = sources.len(),
            policy = %default_policy,
            delete_sources = delete_sources_on_success,
            "paste: batch created"
        );

        Ok(Self {
            destination_dir,
            delete_sources_on_success,
            default_policy,
            options,
            items,
            done: false,
            cancelled: false,
        })
    }

    /// Run one pass over all items. Returns `is_done()`.
    ///
    /// Failed items do not stop the pass; they wait for a solution and are
    /// picked up by a later call. An item whose solution is `Cancel` (or a
    /// requested shutdown) cancels the batch.
    pub fn execute(&mut self) -> bool {
        if self.done || self.cancelled {
            return self.done;
        }

        let ctx = ItemContext {
            default_policy: self.default_policy,
            delete_sources: self.delete_sources_on_success,
            options: &self.options,
        };
        for item in self.items.iter_mut() {
            if shutdown::is_requested() {
                warn!(dest = %self.destination_dir.display(), "paste: shutdown requested, cancelling");
                self.cancelled = true;
                break;
            }
            if item.try_execute(&ctx) == Attempt::Cancel {
                info!(source = %item.source().display(), "paste: cancelled by operator");
                self.cancelled = true;
                break;
            }
        }

        self.done = self.items.iter().all(TransferItem::is_done);
        self.done
    }

    /// Stop the paste; later `execute()` calls do nothing. Nothing is rolled back.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    pub fn delete_sources_on_success(&self) -> bool {
        self.delete_sources_on_success
    }

    pub fn default_policy(&self) -> CollisionPolicy {
        self.default_policy
    }

    /// Applies to items without their own override from the next pass on.
    pub fn set_default_policy(&mut self, policy: CollisionPolicy) {
        self.default_policy = policy;
    }

    pub fn options(&self) -> &TransferOptions {
        &self.options
    }

    pub fn items(&self) -> &[TransferItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [TransferItem] {
        &mut self.items
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut TransferItem> {
        self.items.get_mut(index)
    }

    pub fn failed_items(&self) -> impl Iterator<Item = &TransferItem> {
        self.items.iter().filter(|i| i.did_fail())
    }

    pub fn failed_items_mut(&mut self) -> impl Iterator<Item = &mut TransferItem> {
        self.items.iter_mut().filter(|i| i.did_fail())
    }

    pub fn report(&self) -> BatchReport {
        let done = self.items.iter().filter(|i| i.is_done()).count();
        let failed = self.items.iter().filter(|i| i.did_fail()).count();
        BatchReport {
            total: self.items.len(),
            done,
            failed,
            pending: self.items.len() - done - failed,
            cancelled: self.cancelled,
            sources_removed: self.items.iter().filter(|i| i.source_removed()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::ItemState;

    #[test]
    fn empty_sources_are_rejected() {
        let td = tempfile::tempdir().unwrap();
        let err = TransferBatch::new(Vec::<PathBuf>::new(), td.path(), false, CollisionPolicy::default(), TransferOptions::default())
            .unwrap_err();
        assert!(matches!(err, BatchError::NoSources));
    }

    #[test]
    fn destination_must_be_an_existing_directory() {
        let td = tempfile::tempdir().unwrap();
        let file = td.path().join("f");
        fs::write(&file, b"x").unwrap();

        let missing = TransferBatch::new([&file], td.path().join("nope"), false, CollisionPolicy::default(), TransferOptions::default());
        assert!(matches!(missing, Err(BatchError::DestinationMissing(_))));

        let not_dir = TransferBatch::new([&file], &file, false, CollisionPolicy::default(), TransferOptions::default());
        assert!(matches!(not_dir, Err(BatchError::DestinationNotDirectory(_))));
    }

    #[test]
    fn duplicates_collapse_in_order() {
        let td = tempfile::tempdir().unwrap();
        let dst = td.path().join("dst");
        fs::create_dir(&dst).unwrap();
        let a = td.path().join("a");
        let b = td.path().join("b");
        let batch = TransferBatch::new([&a, &b, &a], &dst, false, CollisionPolicy::default(), TransferOptions::default()).unwrap();
        let sources: Vec<&Path> = batch.items().iter().map(TransferItem::source).collect();
        assert_eq!(sources, vec![a.as_path(), b.as_path()]);
        assert!(batch.items().iter().all(|i| i.state() == ItemState::Init));
    }

    #[test]
    fn cancelled_batch_ignores_execute() {
        let td = tempfile::tempdir().unwrap();
        let dst = td.path().join("dst");
        fs::create_dir(&dst).unwrap();
        let a = td.path().join("a.txt");
        fs::write(&a, b"x").unwrap();
        let mut batch = TransferBatch::new([&a], &dst, false, CollisionPolicy::default(), TransferOptions::default()).unwrap();
        batch.cancel();
        assert!(!batch.execute());
        assert!(!dst.join("a.txt").exists());
        assert!(batch.report().cancelled);
    }

    #[test]
    fn summary_mentions_counts() {
        let r = BatchReport { total: 4, done: 3, failed: 1, pending: 0, cancelled: false, sources_removed: 0 };
        assert_eq!(r.summary(), "Paste incomplete: 3 of 4 done, 1 failed, 0 pending");
    }
}
