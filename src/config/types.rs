//! Core configuration types.
//! - Config holds runtime settings with defaults.
//! - LogLevel represents verbosity with lenient parsing.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;
use crate::fs_ops::DEFAULT_MAX_SIBLING_ATTEMPTS;
use crate::resource::DEFAULT_HISTORY_LIMIT;
use crate::transfer::{CollisionPolicy, TransferOptions};

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Warnings and errors (default)
    #[default]
    Normal,
    /// Per-item progress
    Info,
    /// Everything, including sibling probing
    Debug,
}

impl LogLevel {
    /// Parse common names into a LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" | "warn" => Some(LogLevel::Normal),
            "info" | "verbose" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Runtime configuration for the explorer engine and CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding favorites, history and explorer state
    pub storage_dir: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Collision policy for pastes unless overridden per item
    pub collision_policy: CollisionPolicy,
    pub max_sibling_attempts: u32,
    pub verify_before_delete: bool,
    pub check_free_space: bool,
    pub preserve_timestamps: bool,
    /// Entries kept in the directory history file
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: paths::default_storage_dir(),
            log_level: LogLevel::Normal,
            log_file: None,
            collision_policy: CollisionPolicy::default(),
            max_sibling_attempts: DEFAULT_MAX_SIBLING_ATTEMPTS,
            verify_before_delete: true,
            check_free_space: true,
            preserve_timestamps: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Paste tunables derived from this config.
    pub fn transfer_options(&self) -> TransferOptions {
        TransferOptions {
            max_sibling_attempts: self.max_sibling_attempts,
            verify_before_delete: self.verify_before_delete,
            check_free_space: self.check_free_space,
            preserve_timestamps: self.preserve_timestamps,
        }
    }
}
