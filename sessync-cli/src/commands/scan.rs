//! `sessync scan` — list project directories on the remote host or locally.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use sessync_sync::{RemoteShell, SshShell};

use super::{load_config, GlobalArgs};

#[derive(Subcommand, Debug)]
pub enum ScanCommand {
    /// Directories under the remote root (runs `ls` over ssh).
    Remote,
    /// Directories under the local root.
    Local,
}

pub fn run(command: ScanCommand, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    match command {
        ScanCommand::Remote => {
            let shell = SshShell::new(&config.tools);
            let entries = shell
                .list_dir(&config.remote_alias, &config.remote_root)
                .with_context(|| format!("failed to scan {}:{}", config.remote_alias, config.remote_root))?;
            let configured: BTreeSet<&str> =
                config.projects.iter().map(|p| p.remote_dir.as_str()).collect();
            print_entries(
                &format!("{}:{}", config.remote_alias, config.remote_root),
                &entries,
                &configured,
            );
        }
        ScanCommand::Local => {
            let entries = local_dirs(&config.local_root)?;
            let configured: BTreeSet<&str> =
                config.projects.iter().map(|p| p.local_dir.as_str()).collect();
            print_entries(&config.local_root.display().to_string(), &entries, &configured);
        }
    }
    Ok(())
}

/// Sorted names of non-hidden directories directly under `root`.
fn local_dirs(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries =
        fs::read_dir(root).with_context(|| format!("failed to read {}", root.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to read {}", root.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn print_entries(location: &str, entries: &[String], configured: &BTreeSet<&str>) {
    println!("{}", location.bold());
    if entries.is_empty() {
        println!("  (empty)");
        return;
    }
    for (i, name) in entries.iter().enumerate() {
        if configured.contains(name.as_str()) {
            println!("{:>4}. {} {}", i + 1, name, "(configured)".green());
        } else {
            println!("{:>4}. {}", i + 1, name);
        }
    }
}
