//! Core library for `explorer_core`.
//!
//! Engine of a desktop file explorer:
//! - `transfer`: paste engine with per-item collision handling, remediation
//!   and cancellation.
//! - `resource`: cached, self-healing resource files (favorites, directory
//!   history) and the explorer state file.
//! - `session`: process-lifetime owner of the cached resources.
//! - `trash` / `selection`: deletion through the trash and the selection rule
//!   applied afterwards.
//!
//! The `explorer` binary is a thin CLI over this library.

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs_ops;
pub mod logging;
pub mod output;
pub mod resource;
pub mod selection;
pub mod session;
pub mod shutdown;
pub mod transfer;
pub mod trash;

pub use config::{Config, LogLevel, default_config_path, default_storage_dir, load_config};
pub use errors::{BatchError, DeleteError, SessionError, TransferError};
pub use resource::{
    CacheEvent, CachedResource, DirectoryHistory, ExplorerPersistentState, FavoriteEntry, ResourceFile, StorageManager,
};
pub use selection::selection_after_removal;
pub use session::Session;
pub use transfer::{
    BatchReport, CollisionPolicy, ErrorSolution, ItemState, TransferBatch, TransferItem, TransferOptions,
};
pub use trash::{DeleteOutcome, SystemTrash, Trash, delete_path};
