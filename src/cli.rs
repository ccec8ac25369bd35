//! CLI definition and parsing.
//!
//! Notes:
//! - `paste` takes one or more sources followed by the destination directory.
//! - --debug is a shorthand for --log-level debug.
//! - Flags override values from the XML config.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::config::{Config, LogLevel};
use crate::transfer::{CollisionPolicy, ErrorSolution};

/// Command-line driver for the explorer engine.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "File explorer engine: paste, favorites, history and state")]
pub struct Args {
    /// Directory holding favorites, history and explorer state.
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub storage_dir: Option<PathBuf>,

    /// Set log level: quiet, normal, info, debug.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Enable debug logging (shorthand for --log-level debug).
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Also write logs to this file.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Print the config file location and the effective config, then exit.
    #[arg(long)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Copy (or move) sources into a destination directory.
    Paste {
        /// Sources followed by the destination directory.
        #[arg(required = true, num_args = 2.., value_name = "PATHS", value_hint = ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        /// Remove sources after a verified copy.
        #[arg(long = "move")]
        move_sources: bool,

        /// Collision policy: sibling, later, mark.
        #[arg(long, value_name = "POLICY")]
        collision: Option<CollisionPolicy>,

        /// What to do with failed items: skip, retry, cancel.
        #[arg(long, value_name = "SOLUTION")]
        on_error: Option<ErrorSolution>,

        /// Maximum execute rounds before giving up.
        #[arg(long, default_value_t = 3, value_name = "N")]
        max_rounds: u32,
    },

    /// List, add or remove favorites.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Record that a directory was entered.
    Visit {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
    },

    /// List recently accessed directories.
    Recent {
        /// Order by access count instead of recency.
        #[arg(long)]
        by_count: bool,

        #[arg(long, default_value_t = 10, value_name = "N")]
        max: usize,
    },

    /// Delete a path via the trash, or permanently with confirmation.
    Delete {
        #[arg(value_hint = ValueHint::AnyPath)]
        path: PathBuf,

        /// Confirm permanent deletion when no trash is available.
        #[arg(long)]
        yes: bool,
    },

    /// Show or save the explorer state.
    State {
        #[command(subcommand)]
        action: Option<StateAction>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum FavoritesAction {
    List,
    Add {
        name: String,
        #[arg(value_hint = ValueHint::DirPath)]
        path: PathBuf,
    },
    Remove {
        name: String,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum StateAction {
    Show,
    Save {
        #[arg(value_hint = ValueHint::DirPath)]
        dir: PathBuf,
        #[arg(long, value_hint = ValueHint::AnyPath)]
        selected: Option<PathBuf>,
    },
}

impl Args {
    /// Log level from flags, if any: --log-level wins over --debug.
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if let Some(s) = self.log_level.as_deref()
            && let Some(level) = LogLevel::parse(s)
        {
            return Some(level);
        }
        self.debug.then_some(LogLevel::Debug)
    }

    /// Apply CLI overrides on top of `cfg` (CLI wins).
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(dir) = &self.storage_dir {
            cfg.storage_dir = dir.clone();
        }
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(file) = &self.log_file {
            cfg.log_file = Some(file.clone());
        }
        if let Some(Command::Paste { collision: Some(policy), .. }) = &self.command {
            cfg.collision_policy = *policy;
        }
    }
}

/// Split `paste` paths into sources and destination (the last path).
pub fn split_paste_paths(paths: &[PathBuf]) -> Option<(&[PathBuf], &PathBuf)> {
    let (dest, sources) = paths.split_last()?;
    if sources.is_empty() {
        return None;
    }
    Some((sources, dest))
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paste_splits_destination() {
        let args = Args::try_parse_from(["explorer", "paste", "a", "b", "dst", "--collision", "later"]).unwrap();
        let Some(Command::Paste { paths, collision, .. }) = &args.command else {
            panic!("expected paste");
        };
        let (sources, dest) = split_paste_paths(paths).unwrap();
        assert_eq!(sources, [PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(dest, &PathBuf::from("dst"));
        assert_eq!(*collision, Some(CollisionPolicy::ResolveLater));
    }

    #[test]
    fn paste_needs_source_and_destination() {
        assert!(Args::try_parse_from(["explorer", "paste", "only"]).is_err());
    }

    #[test]
    fn log_level_flag_beats_debug() {
        let args = Args::try_parse_from(["explorer", "--debug", "--log-level", "quiet", "recent"]).unwrap();
        assert_eq!(args.effective_log_level(), Some(LogLevel::Quiet));
        let mut cfg = Config::default();
        args.apply_overrides(&mut cfg);
        assert_eq!(cfg.log_level, LogLevel::Quiet);
    }
}
