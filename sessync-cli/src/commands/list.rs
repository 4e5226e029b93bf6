//! `sessync list` — configured projects.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use sessync_core::{Config, Project, SyncMode};

use super::{load_config, GlobalArgs};

/// Arguments for `sessync list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let config = load_config(global)?;
        if self.json {
            return print_json(&config);
        }
        print_table(&config);
        Ok(())
    }
}

#[derive(Serialize)]
struct ListJson<'a> {
    remote_alias: &'a str,
    remote_root: &'a str,
    local_root: String,
    projects: &'a [Project],
}

fn print_json(config: &Config) -> Result<()> {
    let out = ListJson {
        remote_alias: &config.remote_alias,
        remote_root: &config.remote_root,
        local_root: config.local_root.display().to_string(),
        projects: &config.projects,
    };
    let json = serde_json::to_string_pretty(&out).context("failed to serialize project list")?;
    println!("{json}");
    Ok(())
}

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "project")]
    name: String,
    #[tabled(rename = "mode")]
    mode: String,
    #[tabled(rename = "enabled")]
    enabled: String,
    #[tabled(rename = "remote dir")]
    remote_dir: String,
    #[tabled(rename = "local dir")]
    local_dir: String,
}

fn print_table(config: &Config) {
    println!(
        "sessync v{} | remote {}:{} | local {}",
        env!("CARGO_PKG_VERSION"),
        config.remote_alias.bold(),
        config.remote_root,
        config.local_root.display(),
    );

    if config.projects.is_empty() {
        println!("No projects configured.");
        return;
    }

    let rows: Vec<ProjectRow> = config
        .projects
        .iter()
        .map(|p| ProjectRow {
            name: p.name.to_string(),
            mode: mode_label(p.mode),
            enabled: if p.enabled {
                "yes".green().to_string()
            } else {
                "no".bright_black().to_string()
            },
            remote_dir: p.remote_dir.clone(),
            local_dir: p.local_dir.clone(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn mode_label(mode: SyncMode) -> String {
    match mode {
        SyncMode::PullOnly => "← pull".cyan().to_string(),
        SyncMode::PushOnly => "→ push".magenta().to_string(),
        SyncMode::Bidirectional => "↔ both".green().to_string(),
    }
}
