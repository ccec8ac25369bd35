use std::path::PathBuf;

/// Where the explorer was when it last shut down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerPersistentState {
    pub current_dir: PathBuf,
    /// Selected entry, usually inside `current_dir`.
    pub selected_path: Option<PathBuf>,
}

impl ExplorerPersistentState {
    pub fn new(current_dir: impl Into<PathBuf>, selected_path: Option<PathBuf>) -> Self {
        Self { current_dir: current_dir.into(), selected_path }
    }
}
