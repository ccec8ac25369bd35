//! Deleting paths through the desktop trash.

use std::path::Path;
use tracing::{info, warn};

use crate::errors::DeleteError;
use crate::fs_ops::helpers::delete_io;
use crate::fs_ops::{path_exists, remove_tree};

/// Trash capability of the platform.
pub trait Trash {
    fn is_supported(&self) -> bool;
    /// Move `path` to the trash; false on failure.
    fn move_to_trash(&self, path: &Path) -> bool;
}

/// Trash backed by the platform's recycle bin / freedesktop trash.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTrash;

impl Trash for SystemTrash {
    fn is_supported(&self) -> bool {
        cfg!(any(windows, all(unix, not(target_os = "android"), not(target_os = "ios"))))
    }

    fn move_to_trash(&self, path: &Path) -> bool {
        match trash::delete(path) {
            Ok(()) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "trash: move failed");
                false
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Trashed,
    Deleted,
    /// Permanent deletion was not confirmed; nothing changed.
    Declined,
}

/// Delete `path`: to the trash when supported, otherwise permanently once
/// `confirm_permanent` agrees. Symlinks are removed, not followed.
pub fn delete_path(
    path: &Path,
    trash: &dyn Trash,
    confirm_permanent: impl FnOnce() -> bool,
) -> Result<DeleteOutcome, DeleteError> {
    if !path_exists(path).map_err(delete_io("stat path", path))? {
        return Err(DeleteError::NotFound(path.to_path_buf()));
    }

    if trash.is_supported() {
        if !trash.move_to_trash(path) {
            return Err(DeleteError::TrashFailed(path.to_path_buf()));
        }
        info!(path = %path.display(), "delete: moved to trash");
        return Ok(DeleteOutcome::Trashed);
    }

    if !confirm_permanent() {
        info!(path = %path.display(), "delete: permanent deletion declined");
        return Ok(DeleteOutcome::Declined);
    }
    remove_tree(path).map_err(delete_io("delete", path))?;
    info!(path = %path.display(), "delete: removed permanently");
    Ok(DeleteOutcome::Deleted)
}
