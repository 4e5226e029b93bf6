//! sessync — sync session logs between a remote host and this machine,
//! rewriting embedded paths on the way.
//!
//! # Usage
//!
//! ```text
//! sessync [--config <path>] [--dry-run] [-v...] list [--json]
//! sessync pull <project>
//! sessync push <project> [--yes]
//! sessync sync-all [--include-push] [--yes]
//! sessync scan remote|local
//! ```
//!
//! # Exit codes
//!
//! `0` success (including a declined push), `1` configuration error,
//! `2` operation failure, `3` direction not allowed.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use colored::Colorize;

use commands::{
    list::ListArgs,
    scan::ScanCommand,
    sync::{PullArgs, PushArgs, SyncAllArgs},
    GlobalArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "sessync",
    version,
    about = "Sync session logs between a remote host and this machine, rewriting paths",
    long_about = None,
)]
struct Cli {
    /// Configuration file (default: ~/.sessync/config.json).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Stage and rewrite, but only report what the final transfer would change.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List configured projects.
    List(ListArgs),

    /// Pull a project from the remote host.
    Pull(PullArgs),

    /// Push a project to the remote host (asks for confirmation).
    Push(PushArgs),

    /// Pull every eligible project; optionally push as well.
    SyncAll(SyncAllArgs),

    /// List project directories on either side.
    Scan {
        #[command(subcommand)]
        command: ScanCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let global = GlobalArgs {
        config: cli.config,
        dry_run: cli.dry_run,
    };
    let result = match cli.command {
        Commands::List(args) => args.run(&global),
        Commands::Pull(args) => args.run(&global),
        Commands::Push(args) => args.run(&global),
        Commands::SyncAll(args) => args.run(&global),
        Commands::Scan { command } => commands::scan::run(command, &global),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::from(commands::exit_code(&err))
        }
    }
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
