//! Persistent resources: the generic cache and the files it wraps.

pub mod cached;
pub mod favorites;
pub mod history;
pub mod lines;
pub mod state;
pub mod storage;

pub use cached::{CacheEvent, CachedResource, ResourceFile};
pub use favorites::{FavoriteEntry, FavoritesFile};
pub use history::{DEFAULT_HISTORY_LIMIT, DirectoryAccessEntry, DirectoryHistory, HistoryFile};
pub use lines::{parse_key_value_lines, to_portable};
pub use state::ExplorerPersistentState;
pub use storage::StorageManager;
