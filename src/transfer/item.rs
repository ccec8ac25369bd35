//! Per-source state machine of a paste.
//!
//! Init -> CollisionDetected -> CollisionResolved -> TargetCopied -> Done
//!
//! A collision is only looked for while the item is in `Init`; once the
//! target path is decided the item copies, optionally verifies and removes
//! the source, and finishes. Any failure is recorded on the item together
//! with the state it happened in, and the item waits for an operator
//! `ErrorSolution` before doing anything else.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::options::ItemContext;
use super::policy::{CollisionPolicy, ErrorSolution, ItemState};
use crate::errors::TransferError;
use crate::fs_ops::helpers::transfer_io;
use crate::fs_ops::{
    TreeStats, copy_tree, ensure_space_for_copy, next_free_sibling, path_exists, remove_tree, tree_stats,
    verify_copy,
};

/// Outcome of one `try_execute` call, consumed by the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// The item is done.
    Finished,
    /// This attempt failed; the error is recorded on the item.
    Failed,
    /// The item has failed before and no solution has been chosen.
    Waiting,
    /// The operator asked to cancel the whole paste.
    Cancel,
}

#[derive(Debug)]
pub struct TransferItem {
    source: PathBuf,
    original_target: PathBuf,
    actual_target: PathBuf,
    state: ItemState,
    last_error: Option<TransferError>,
    failed_in: Option<ItemState>,
    error_solution: Option<ErrorSolution>,
    policy_override: Option<CollisionPolicy>,
    source_removed: bool,
    copied: Option<TreeStats>,
}

impl TransferItem {
    /// `source` must have a file name; the batch checks this on construction.
    pub(crate) fn new(source: &Path, destination_dir: &Path) -> Self {
        let original_target = match source.file_name() {
            Some(name) => destination_dir.join(name),
            None => destination_dir.to_path_buf(),
        };
        Self {
            source: source.to_path_buf(),
            actual_target: original_target.clone(),
            original_target,
            state: ItemState::Init,
            last_error: None,
            failed_in: None,
            error_solution: None,
            policy_override: None,
            source_removed: false,
            copied: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// `destination_dir/<source file name>`.
    pub fn original_target(&self) -> &Path {
        &self.original_target
    }

    /// Where the copy lands; differs from `original_target` after a sibling
    /// name was chosen.
    pub fn actual_target(&self) -> &Path {
        &self.actual_target
    }

    pub fn state(&self) -> ItemState {
        self.state
    }

    pub fn last_error(&self) -> Option<&TransferError> {
        self.last_error.as_ref()
    }

    pub fn error_solution(&self) -> Option<ErrorSolution> {
        self.error_solution
    }

    pub fn policy_override(&self) -> Option<CollisionPolicy> {
        self.policy_override
    }

    /// True once a moved source has been removed after a successful copy.
    pub fn source_removed(&self) -> bool {
        self.source_removed
    }

    /// What the copy step wrote, when it ran.
    pub fn copied(&self) -> Option<TreeStats> {
        self.copied
    }

    pub fn did_fail(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn is_done(&self) -> bool {
        self.state == ItemState::Done && self.last_error.is_none()
    }

    /// Choose how a failed item proceeds. Returns false (and changes nothing)
    /// when the item has not failed.
    pub fn set_error_solution(&mut self, solution: ErrorSolution) -> bool {
        if self.last_error.is_none() {
            return false;
        }
        self.error_solution = Some(solution);
        true
    }

    /// Use `policy` for this item instead of the batch default.
    pub fn set_policy_override(&mut self, policy: Option<CollisionPolicy>) {
        self.policy_override = policy;
    }

    pub fn effective_policy(&self, default_policy: CollisionPolicy) -> CollisionPolicy {
        self.policy_override.unwrap_or(default_policy)
    }

    /// Advance the item as far as possible. Errors are recorded on the item,
    /// never returned.
    pub fn try_execute(&mut self, ctx: &ItemContext<'_>) -> Attempt {
        if self.is_done() {
            return Attempt::Finished;
        }

        if self.last_error.is_some() {
            match self.error_solution {
                None => return Attempt::Waiting,
                Some(ErrorSolution::Cancel) => return Attempt::Cancel,
                Some(ErrorSolution::Skip) => {
                    info!(source = %self.source.display(), state = %self.state, "paste: item skipped by operator");
                    self.clear_error();
                    self.state = ItemState::Done;
                    return Attempt::Finished;
                }
                Some(ErrorSolution::Retry) => {
                    let failed_in = self.failed_in;
                    self.clear_error();
                    if failed_in.is_some_and(|s| s <= ItemState::CollisionResolved) {
                        self.actual_target = self.original_target.clone();
                        self.state = ItemState::Init;
                    }
                    debug!(source = %self.source.display(), state = %self.state, "paste: retrying item");
                }
            }
        }

        match self.run(ctx) {
            Ok(()) => {
                if self.is_done() {
                    Attempt::Finished
                } else {
                    // run() always reaches Done or fails
                    Attempt::Waiting
                }
            }
            Err(e) => {
                warn!(
                    source = %self.source.display(),
                    dest = %self.actual_target.display(),
                    state = %self.state,
                    code = e.code(),
                    kind = e.kind(),
                    error = %e,
                    "paste: item failed"
                );
                self.failed_in = Some(self.state);
                self.last_error = Some(e);
                Attempt::Failed
            }
        }
    }

    fn clear_error(&mut self) {
        self.last_error = None;
        self.error_solution = None;
        self.failed_in = None;
    }

    fn run(&mut self, ctx: &ItemContext<'_>) -> Result<(), TransferError> {
        if self.state < ItemState::TargetCopied {
            let present = path_exists(&self.source).map_err(transfer_io("stat source", &self.source))?;
            if !present {
                return Err(TransferError::SourceVanished(self.source.clone()));
            }
        }

        if self.state == ItemState::Init {
            self.detect_collision()?;
        }
        if self.state == ItemState::CollisionDetected {
            self.resolve_collision(ctx)?;
        }
        if self.state == ItemState::CollisionResolved {
            self.copy(ctx)?;
        }
        if self.state == ItemState::TargetCopied {
            self.finish(ctx)?;
        }
        Ok(())
    }

    fn detect_collision(&mut self) -> Result<(), TransferError> {
        let taken = path_exists(&self.actual_target).map_err(transfer_io("stat target", &self.actual_target))?;
        self.state = if taken {
            debug!(dest = %self.actual_target.display(), "paste: collision detected");
            ItemState::CollisionDetected
        } else {
            ItemState::CollisionResolved
        };
        Ok(())
    }

    fn resolve_collision(&mut self, ctx: &ItemContext<'_>) -> Result<(), TransferError> {
        match self.effective_policy(ctx.default_policy) {
            CollisionPolicy::CreateSibling => {
                let max = ctx.options.max_sibling_attempts;
                let found = next_free_sibling(&self.original_target, max).map_err(|cause| TransferError::Collision {
                    src: self.source.clone(),
                    original_target: self.original_target.clone(),
                    actual_target: self.actual_target.clone(),
                    cause,
                })?;
                let Some(sibling) = found else {
                    return Err(TransferError::SiblingNamesExhausted {
                        target: self.original_target.clone(),
                        attempts: max,
                    });
                };
                debug!(original = %self.original_target.display(), sibling = %sibling.display(), "paste: using sibling name");
                self.actual_target = sibling;
                self.state = ItemState::CollisionResolved;
                Ok(())
            }
            CollisionPolicy::ResolveLater => Err(TransferError::CollisionUnresolved {
                target: self.actual_target.clone(),
            }),
            CollisionPolicy::MarkResolved => {
                info!(dest = %self.actual_target.display(), "paste: collision marked resolved, nothing copied");
                self.state = ItemState::Done;
                Ok(())
            }
        }
    }

    fn copy(&mut self, ctx: &ItemContext<'_>) -> Result<(), TransferError> {
        if ctx.options.check_free_space {
            let required = tree_stats(&self.source)
                .map_err(transfer_io("measure source", &self.source))?
                .bytes;
            let dest_dir = self.actual_target.parent().unwrap_or_else(|| Path::new("."));
            ensure_space_for_copy(dest_dir, required)?;
        }

        let stats = copy_tree(&self.source, &self.actual_target, ctx.options.preserve_timestamps)?;
        debug!(
            source = %self.source.display(),
            dest = %self.actual_target.display(),
            files = stats.files,
            bytes = stats.bytes,
            "paste: copied"
        );
        self.copied = Some(stats);
        self.state = ItemState::TargetCopied;
        Ok(())
    }

    fn finish(&mut self, ctx: &ItemContext<'_>) -> Result<(), TransferError> {
        if ctx.delete_sources && !self.source_removed {
            let present = path_exists(&self.source).map_err(transfer_io("stat source", &self.source))?;
            if present {
                if ctx.options.verify_before_delete {
                    verify_copy(&self.source, &self.actual_target)?;
                }
                remove_tree(&self.source).map_err(transfer_io("remove source", &self.source))?;
                self.source_removed = true;
            } else {
                debug!(source = %self.source.display(), "paste: source already gone after copy");
            }
        }
        info!(source = %self.source.display(), dest = %self.actual_target.display(), "paste: item done");
        self.state = ItemState::Done;
        Ok(())
    }
}
