//! Typed error definitions for explorer_core.
//! Transfer errors are recorded on the item that produced them and never
//! escape `execute()`; batch errors are only returned from construction.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single pasted item failed on its last attempt.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Source vanished before it could be pasted: {0}")]
    SourceVanished(PathBuf),

    #[error(
        "Error while resolving paste collision for {src} -> {original_target} (actual target {actual_target}): {cause}"
    )]
    Collision {
        src: PathBuf,
        original_target: PathBuf,
        actual_target: PathBuf,
        #[source]
        cause: io::Error,
    },

    #[error("Collision at {target} was left for the caller to resolve")]
    CollisionUnresolved { target: PathBuf },

    #[error("No free sibling name next to {target} after {attempts} attempts")]
    SiblingNamesExhausted { target: PathBuf, attempts: u32 },

    #[error("Insufficient disk space for destination {dest}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        required: u64,
        available: u64,
        dest: PathBuf,
    },

    #[error("Copy of {src} at {target} does not match the source ({detail}); source kept")]
    VerificationFailed {
        src: PathBuf,
        target: PathBuf,
        detail: String,
    },

    #[error("{message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: io::Error,
    },
}

impl TransferError {
    /// Stable numeric code for structured logs.
    pub fn code(&self) -> u16 {
        match self {
            TransferError::SourceVanished(_) => 10,
            TransferError::Collision { .. } => 20,
            TransferError::CollisionUnresolved { .. } => 21,
            TransferError::SiblingNamesExhausted { .. } => 22,
            TransferError::InsufficientSpace { .. } => 30,
            TransferError::VerificationFailed { .. } => 40,
            TransferError::Io { .. } => 50,
        }
    }

    /// Short machine-friendly label, paired with `code()` in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            TransferError::SourceVanished(_) => "source_vanished",
            TransferError::Collision { .. } => "collision",
            TransferError::CollisionUnresolved { .. } => "collision_unresolved",
            TransferError::SiblingNamesExhausted { .. } => "sibling_names_exhausted",
            TransferError::InsufficientSpace { .. } => "insufficient_space",
            TransferError::VerificationFailed { .. } => "verification_failed",
            TransferError::Io { .. } => "io",
        }
    }

    /// True for errors the operator resolves by picking a collision policy.
    pub fn is_collision(&self) -> bool {
        matches!(
            self,
            TransferError::Collision { .. }
                | TransferError::CollisionUnresolved { .. }
                | TransferError::SiblingNamesExhausted { .. }
        )
    }
}

/// Reasons a paste batch cannot be created at all.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Source file list is empty")]
    NoSources,

    #[error("Source has no file name to paste under: {0}")]
    InvalidSource(PathBuf),

    #[error("Destination directory does not exist: {0}")]
    DestinationMissing(PathBuf),

    #[error("Destination is not a directory: {0}")]
    DestinationNotDirectory(PathBuf),

    #[error("Cannot paste directory {src} into itself or its descendant {destination}")]
    SelfContainment { src: PathBuf, destination: PathBuf },

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },
}

/// Errors surfaced by session-level favorite management.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A favorite named '{0}' already exists")]
    DuplicateFavorite(String),

    #[error("Favorite name must not be empty or contain '='")]
    InvalidFavoriteName,

    #[error("Directory has no name to use as a favorite: {0}")]
    UnnamedDirectory(PathBuf),
}

/// Errors from deleting a path through the trash collaborator.
#[derive(Debug, Error)]
pub enum DeleteError {
    #[error("Path to delete does not exist: {0}")]
    NotFound(PathBuf),

    #[error("Failed to move {0} to the trash")]
    TrashFailed(PathBuf),

    #[error("{message}")]
    Io {
        message: String,
        #[source]
        source: io::Error,
    },
}
