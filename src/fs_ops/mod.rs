//! Filesystem operations behind the paste engine.
//!
//! - `sibling`: `name_copyN.ext` candidates for the CreateSibling policy.
//! - `containment`: guard against pasting a directory into itself.
//! - `copy`: recursive, non-clobbering, symlink-preserving copy.
//! - `verify`: tree statistics and removal of verified sources.
//! - `space`: free-space precheck.
//! - `helpers`: I/O error messages with actionable hints.

pub mod containment;
pub mod copy;
pub mod helpers;
pub mod sibling;
pub mod space;
pub mod verify;

pub use containment::is_self_containment;
pub use copy::copy_tree;
pub use helpers::{describe_io_error, path_exists};
pub use sibling::{DEFAULT_MAX_SIBLING_ATTEMPTS, next_free_sibling, sibling_name};
pub use space::{ensure_space_for_copy, format_bytes};
pub use verify::{TreeStats, remove_tree, tree_stats, verify_copy};
