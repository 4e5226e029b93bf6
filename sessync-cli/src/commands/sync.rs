//! `sessync pull`, `sessync push` and `sessync sync-all`.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use sessync_core::{Config, Operation};
use sessync_sync::{
    pipeline::{self, Attempt},
    Orchestrator, RsyncTransfer, SyncOptions, SyncOutcome, SyncReport,
};

use super::{load_config, GlobalArgs, TerminalConfirm};

/// Arguments for `sessync pull`.
#[derive(Args, Debug)]
pub struct PullArgs {
    /// Project to pull from the remote host.
    pub project: String,
}

/// Arguments for `sessync push`.
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Project to push to the remote host.
    pub project: String,

    /// Skip the confirmation prompt (not for pull-only projects).
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `sessync sync-all`.
#[derive(Args, Debug)]
pub struct SyncAllArgs {
    /// Also push projects whose mode allows it.
    #[arg(long)]
    pub include_push: bool,

    /// Skip the per-project push confirmation.
    #[arg(short, long, requires = "include_push")]
    pub yes: bool,
}

impl PullArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global)?;
        run_single(&config, global, &self.project, Operation::Pull, false)
    }
}

impl PushArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global)?;
        run_single(&config, global, &self.project, Operation::Push, self.yes)
    }
}

impl SyncAllArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global)?;
        let transfer = RsyncTransfer::new(&config.tools);
        let orchestrator = Orchestrator::new(
            &config,
            &transfer,
            &TerminalConfirm,
            SyncOptions {
                dry_run: global.dry_run,
                assume_yes: self.yes,
            },
        );

        let report = pipeline::sync_all(&orchestrator, self.include_push);
        if report.attempts.is_empty() {
            println!("No enabled projects to sync.");
            return Ok(());
        }
        for attempt in &report.attempts {
            print_attempt(attempt);
        }
        let failed = report.failed();
        println!(
            "{} attempted, {} succeeded, {} failed",
            report.attempts.len(),
            report.attempts.len() - failed,
            failed
        );
        report.into_result()?;
        Ok(())
    }
}

fn run_single(
    config: &Config,
    global: &GlobalArgs,
    project: &str,
    operation: Operation,
    assume_yes: bool,
) -> Result<()> {
    let transfer = RsyncTransfer::new(&config.tools);
    let orchestrator = Orchestrator::new(
        config,
        &transfer,
        &TerminalConfirm,
        SyncOptions {
            dry_run: global.dry_run,
            assume_yes,
        },
    );
    let outcome = orchestrator
        .run(project, operation)
        .with_context(|| format!("{operation} failed for '{project}'"))?;
    match outcome {
        SyncOutcome::Completed(report) => print_report(&report),
        SyncOutcome::Declined => println!("Cancelled."),
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let transform = &report.transform;
    println!(
        "{prefix}{} {} '{}' ({} files, {} rewritten)",
        "✓".green(),
        report.operation,
        report.project,
        transform.files_visited,
        transform.files_changed,
    );
    for path in &transform.skipped {
        println!(
            "  {}  {}/{} (not readable as UTF-8 text, left as is)",
            "!".yellow(),
            report.destination,
            path.display()
        );
    }
    if report.dry_run {
        let output = report.transfer_output.trim_end();
        if output.is_empty() {
            println!("  ·  no changes");
        }
        for line in output.lines() {
            println!("  ~  {line}");
        }
    }
}

fn print_attempt(attempt: &Attempt) {
    match &attempt.result {
        Ok(SyncOutcome::Completed(report)) => print_report(report),
        Ok(SyncOutcome::Declined) => println!(
            "{} {} '{}' skipped",
            "·".bright_black(),
            attempt.operation,
            attempt.project
        ),
        Err(err) => println!(
            "{} {} '{}' failed: {err}",
            "✗".red(),
            attempt.operation,
            attempt.project
        ),
    }
}
