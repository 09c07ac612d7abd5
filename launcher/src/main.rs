//! Double-clickable launcher for the NBA watchlist app.
//!
//! Remembers the watchlist repository in `~/.nba_watchlist_launcher.json`.
//! When the saved location is missing or stale the user is asked to pick the
//! folder again; the chosen folder is saved and its entry script is started.
//! Delete the record file to forget a wrong folder.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use watchlist_launcher::core::state::{AbortReason, CancelPolicy};
use watchlist_launcher::exit_codes;
use watchlist_launcher::io::config::{InteractionMode, LauncherConfig, default_interpreter};
use watchlist_launcher::io::config_store::FileConfigStore;
use watchlist_launcher::io::handoff::PythonHandoff;
use watchlist_launcher::io::interaction::{ConsoleInteraction, DialogInteraction, Interaction};
use watchlist_launcher::io::paths::default_record_path;
use watchlist_launcher::launch::{LaunchOutcome, abort_diagnostic, launch};
use watchlist_launcher::logging;
use watchlist_launcher::marker::{DEFAULT_ENTRY_SCRIPT, Marker};
use watchlist_launcher::resolve::{DIALOG_TITLE, ResolveOptions};
use watchlist_launcher::status::{StatusReport, inspect};

#[derive(Parser)]
#[command(
    name = "watchlist-launcher",
    version,
    about = "Locate the watchlist repository once, then launch its entry script",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    /// Persisted record file (default: ~/.nba_watchlist_launcher.json).
    #[arg(long, global = true, env = "WATCHLIST_LAUNCHER_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Entry script, relative to the repository root.
    #[arg(
        long,
        global = true,
        env = "WATCHLIST_LAUNCHER_MARKER",
        value_name = "RELPATH",
        default_value = DEFAULT_ENTRY_SCRIPT
    )]
    marker: PathBuf,

    /// Interpreter used to run the entry script.
    #[arg(long, global = true, env = "WATCHLIST_LAUNCHER_PYTHON", value_name = "PROGRAM")]
    python: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    launch: LaunchArgs,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the repository and start its entry script (the default).
    Launch(LaunchArgs),
    /// Show the saved repository location and whether it is still valid.
    Status,
}

#[derive(Args, Debug, Default)]
struct LaunchArgs {
    /// Ignore the saved location and pick the folder again.
    #[arg(long)]
    reselect: bool,

    /// Prompt on the terminal instead of showing dialogs.
    #[arg(long)]
    console: bool,

    /// Keep showing the picker after it is cancelled.
    #[arg(long)]
    keep_asking: bool,

    /// Arguments passed through to the entry script (after `--`).
    #[arg(last = true, value_name = "SCRIPT_ARGS")]
    script_args: Vec<OsString>,
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::FAILED);
        }
    }
}

fn run() -> Result<i32> {
    let Cli {
        config,
        marker,
        python,
        command,
        launch: default_launch,
    } = Cli::parse();

    let record_path = match config {
        Some(path) => path,
        None => default_record_path()?,
    };
    let mut cfg = LauncherConfig::new(record_path);
    cfg.marker = Marker::new(marker).context("invalid --marker")?;
    cfg.interpreter = python.unwrap_or_else(|| default_interpreter().to_string());

    match command {
        Some(Command::Status) => {
            cfg.validate()?;
            cmd_status(&cfg)
        }
        Some(Command::Launch(args)) => cmd_launch(cfg, args),
        None => cmd_launch(cfg, default_launch),
    }
}

fn cmd_launch(mut cfg: LauncherConfig, args: LaunchArgs) -> Result<i32> {
    if args.keep_asking {
        cfg.on_cancel = CancelPolicy::Reprompt;
    }
    if args.console {
        cfg.interaction = InteractionMode::Console;
    }
    cfg.validate()?;
    debug!(config = ?cfg, "launch configuration");

    let store = FileConfigStore::new(&cfg.record_path);
    let ui: Box<dyn Interaction> = match cfg.interaction {
        InteractionMode::Dialog => Box::new(DialogInteraction::new()),
        InteractionMode::Console => Box::new(ConsoleInteraction),
    };
    let handoff = PythonHandoff::new(&cfg.interpreter);
    let options = ResolveOptions {
        on_cancel: cfg.on_cancel,
        reselect: args.reselect,
    };

    match launch(
        &store,
        ui.as_ref(),
        &handoff,
        &cfg.marker,
        &options,
        args.script_args,
    )? {
        LaunchOutcome::Launched { .. } => Ok(exit_codes::OK),
        LaunchOutcome::Aborted(reason) => {
            let diagnostic = abort_diagnostic(&reason, &cfg.marker);
            if reason == AbortReason::Cancelled {
                ui.error(DIALOG_TITLE, &diagnostic);
            }
            eprintln!("{diagnostic}");
            Ok(exit_codes::ABORTED)
        }
    }
}

fn cmd_status(cfg: &LauncherConfig) -> Result<i32> {
    let store = FileConfigStore::new(&cfg.record_path);
    let report = inspect(&store, &cfg.marker);
    println!("record: {}", store.path().display());
    println!("marker: {}", cfg.marker);
    match &report {
        StatusReport::Missing => println!("status: missing"),
        StatusReport::Unreadable(err) => println!("status: unreadable ({err})"),
        StatusReport::Stale { repo_path } => println!("status: stale repo_path={repo_path}"),
        StatusReport::Valid { root } => println!("status: valid repo_path={}", root.display()),
    }
    Ok(if report.is_valid() {
        exit_codes::OK
    } else {
        exit_codes::ABORTED
    })
}
