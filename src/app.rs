//! Application orchestrator.
//! Loads/merges config, initializes logging, installs the interrupt handler
//! and dispatches subcommands to the library.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use explorer_core::cli::{Args, Command, FavoritesAction, StateAction, split_paste_paths};
use explorer_core::config::{CONFIG_ENV, default_config_path, default_log_path, load_config, render_config_xml};
use explorer_core::logging::init_tracing;
use explorer_core::output as out;
use explorer_core::transfer::{ErrorSolution, TransferBatch};
use explorer_core::{
    Config, DeleteOutcome, ExplorerPersistentState, Session, StorageManager, SystemTrash, delete_path, shutdown,
};

/// Run the CLI application.
pub fn run(args: Args) -> Result<()> {
    let mut cfg = load_config()?;
    args.apply_overrides(&mut cfg);

    if args.print_config {
        return print_config(&cfg);
    }
    cfg.validate()?;

    let log_guard = init_tracing(cfg.log_level, cfg.log_file.as_deref(), args.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {}", e));
        e
    })?;
    shutdown::install_handler(|| out::print_warn("Received interrupt; cancelling after the current item..."))
        .context("install interrupt handler")?;

    debug!(?args, "starting explorer");

    let result = match args.command.clone() {
        None => {
            out::print_info("No command given. Run with --help to see the available commands.");
            Ok(())
        }
        Some(command) => dispatch(&cfg, command),
    };

    // Flush the file appender before exiting.
    drop(log_guard);
    result
}

fn print_config(cfg: &Config) -> Result<()> {
    if std::env::var_os(CONFIG_ENV).is_some() {
        out::print_info(&format!("Using {} (explicit).", CONFIG_ENV));
    }
    match default_config_path() {
        Some(p) => {
            let state = if p.exists() { "exists" } else { "not created yet; defaults apply" };
            out::print_info(&format!("Config file:\n  {}\n  ({})", p.display(), state));
        }
        None => out::print_warn("Could not determine a config file location; defaults apply."),
    }
    if cfg.log_file.is_none()
        && let Some(p) = default_log_path()
    {
        out::print_info(&format!("File logging is off; set <log_file> (e.g. {}) to enable it.", p.display()));
    }
    out::print_info("Effective configuration:");
    out::print_user(&render_config_xml(cfg)?);
    Ok(())
}

fn dispatch(cfg: &Config, command: Command) -> Result<()> {
    match command {
        Command::Paste { paths, move_sources, on_error, max_rounds, .. } => {
            paste(cfg, &paths, move_sources, on_error, max_rounds)
        }
        Command::Favorites { action } => favorites(cfg, action.unwrap_or(FavoritesAction::List)),
        Command::Visit { dir } => visit(cfg, &dir),
        Command::Recent { by_count, max } => {
            let mut session = open_session(cfg);
            let dirs = if by_count { session.recent_by_access_count(max) } else { session.recent_by_access_time(max) };
            for d in dirs {
                out::print_user(&d.display().to_string());
            }
            Ok(())
        }
        Command::Delete { path, yes } => delete(&path, yes),
        Command::State { action } => state(cfg, action.unwrap_or(StateAction::Show)),
    }
}

fn open_session(cfg: &Config) -> Session {
    Session::open(StorageManager::new(&cfg.storage_dir), cfg.history_limit)
}

fn paste(
    cfg: &Config,
    paths: &[PathBuf],
    move_sources: bool,
    on_error: Option<ErrorSolution>,
    max_rounds: u32,
) -> Result<()> {
    let Some((sources, dest)) = split_paste_paths(paths) else {
        bail!("paste needs at least one source followed by a destination directory");
    };

    let mut batch = TransferBatch::new(
        sources.iter().cloned(),
        dest.clone(),
        move_sources,
        cfg.collision_policy,
        cfg.transfer_options(),
    )
    .inspect_err(|e| error!(error = %e, dest = %dest.display(), "paste rejected"))?;

    let rounds = max_rounds.max(1);
    for round in 1..=rounds {
        if batch.execute() || batch.is_cancelled() {
            break;
        }
        if shutdown::is_requested() {
            batch.cancel();
            break;
        }
        let Some(solution) = on_error else { break };
        if round < rounds {
            debug!(round, %solution, "paste: applying solution to failed items");
            for item in batch.failed_items_mut() {
                item.set_error_solution(solution);
            }
        }
    }

    for item in batch.items() {
        if item.copied().is_some() && item.is_done() {
            out::print_user(&format!("{} -> {}", item.source().display(), item.actual_target().display()));
        }
    }
    for item in batch.failed_items() {
        if let Some(e) = item.last_error() {
            error!(code = e.code(), kind = e.kind(), source = %item.source().display(), "paste item failed");
            out::print_warn(&format!("{}: {}", item.source().display(), e));
        }
    }

    let report = batch.report();
    if batch.is_done() {
        out::print_success(&report.summary());
        Ok(())
    } else {
        bail!(report.summary())
    }
}

fn favorites(cfg: &Config, action: FavoritesAction) -> Result<()> {
    let mut session = open_session(cfg);
    match action {
        FavoritesAction::List => {
            for f in session.favorites() {
                out::print_user(&format!("{}\t{}", f.name, f.path.display()));
            }
        }
        FavoritesAction::Add { name, path } => {
            let path = std::path::absolute(&path).with_context(|| format!("resolve '{}'", path.display()))?;
            session.add_favorite(&name, &path)?;
            out::print_success(&format!("Added favorite '{}' -> {}", name, path.display()));
        }
        FavoritesAction::Remove { name } => {
            if !session.remove_favorite(&name) {
                bail!("No favorite named '{}'", name);
            }
            out::print_success(&format!("Removed favorite '{}'", name));
        }
    }
    Ok(())
}

fn visit(cfg: &Config, dir: &Path) -> Result<()> {
    let dir = dunce::canonicalize(dir).with_context(|| format!("resolve '{}'", dir.display()))?;
    if !dir.is_dir() {
        bail!("Not a directory: {}", dir.display());
    }
    let mut session = open_session(cfg);
    if !session.record_directory_access(&dir) {
        out::print_warn("Directory history could not be written; it will be retried on next access");
    }
    Ok(())
}

fn delete(path: &Path, yes: bool) -> Result<()> {
    match delete_path(path, &SystemTrash, || yes)? {
        DeleteOutcome::Trashed => out::print_success(&format!("Moved to trash: {}", path.display())),
        DeleteOutcome::Deleted => out::print_success(&format!("Deleted: {}", path.display())),
        DeleteOutcome::Declined => {
            out::print_warn("No trash available; pass --yes to delete permanently. Nothing was deleted.")
        }
    }
    Ok(())
}

fn state(cfg: &Config, action: StateAction) -> Result<()> {
    let session = open_session(cfg);
    match action {
        StateAction::Show => {
            let default_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
            let st = session.load_state(&default_dir);
            out::print_user(&format!("currentDir={}", st.current_dir.display()));
            let selected = st.selected_path.map(|p| p.display().to_string()).unwrap_or_default();
            out::print_user(&format!("selectedFile={}", selected));
        }
        StateAction::Save { dir, selected } => {
            let dir = std::path::absolute(&dir).with_context(|| format!("resolve '{}'", dir.display()))?;
            let selected = selected.map(|s| if s.is_absolute() { s } else { dir.join(s) });
            session
                .save_state(&ExplorerPersistentState::new(dir, selected))
                .context("save explorer state")?;
            out::print_success("Explorer state saved");
        }
    }
    Ok(())
}
