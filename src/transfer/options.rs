//! Tunables for a paste and the per-attempt context handed to items.

use super::policy::CollisionPolicy;
use crate::fs_ops::DEFAULT_MAX_SIBLING_ATTEMPTS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Cap on `name_copyN` candidates probed per item.
    pub max_sibling_attempts: u32,
    /// Compare copy and source trees before deleting sources.
    pub verify_before_delete: bool,
    /// Refuse to copy when the destination filesystem lacks space.
    pub check_free_space: bool,
    /// Carry access/modification times over to the copy.
    pub preserve_timestamps: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            max_sibling_attempts: DEFAULT_MAX_SIBLING_ATTEMPTS,
            verify_before_delete: true,
            check_free_space: true,
            preserve_timestamps: true,
        }
    }
}

/// Batch-level settings an item needs on each attempt.
#[derive(Debug, Clone, Copy)]
pub struct ItemContext<'a> {
    pub default_policy: CollisionPolicy,
    pub delete_sources: bool,
    pub options: &'a TransferOptions,
}
