//! Subcommands and the pieces they share: configuration loading, the
//! interactive confirmation and the exit-code contract.

pub mod list;
pub mod scan;
pub mod sync;

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;

use sessync_core::{
    registry::{self, ConfigSource},
    Config, ConfigError,
};
use sessync_sync::{Confirm, Prompt, SyncError};

/// Options accepted by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: Option<PathBuf>,
    pub dry_run: bool,
}

pub const EXIT_CONFIG: u8 = 1;
pub const EXIT_OPERATION: u8 = 2;
pub const EXIT_NOT_ALLOWED: u8 = 3;

/// Load the configuration, warning when the bundled example is used.
pub fn load_config(global: &GlobalArgs) -> Result<Config> {
    let loaded = registry::load(global.config.as_deref()).context("failed to load configuration")?;
    if loaded.source == ConfigSource::Bundled {
        eprintln!(
            "{} no configuration found; using the bundled example. Create ~/.sessync/config.json to customize.",
            "warning:".yellow().bold()
        );
    }
    Ok(loaded.config)
}

/// Map an error chain to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(sync_err) = cause.downcast_ref::<SyncError>() {
            return match sync_err {
                SyncError::Config(_) => EXIT_CONFIG,
                SyncError::DirectionNotAllowed { .. } => EXIT_NOT_ALLOWED,
                _ => EXIT_OPERATION,
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return EXIT_CONFIG;
        }
    }
    EXIT_OPERATION
}

/// Asks on the terminal. Without a terminal every question is answered "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &Prompt) -> bool {
        if prompt.against_mode {
            eprintln!("{} {}", "⚠".yellow().bold(), prompt.message.yellow().bold());
        }
        if !std::io::stdin().is_terminal() {
            eprintln!("{} not a terminal; treating as \"no\"", "warning:".yellow().bold());
            return false;
        }
        let question = if prompt.against_mode {
            "Type y to continue"
        } else {
            prompt.message.as_str()
        };
        dialoguer::Confirm::new()
            .with_prompt(question)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sessync_core::{Operation, ProjectName, SyncMode};

    #[test]
    fn exit_codes_follow_error_category() {
        let config: anyhow::Error = ConfigError::HomeNotFound.into();
        assert_eq!(exit_code(&config), EXIT_CONFIG);

        let unknown: anyhow::Error = SyncError::Config(ConfigError::ProjectNotFound {
            name: "x".into(),
        })
        .into();
        assert_eq!(exit_code(&unknown), EXIT_CONFIG);

        let not_allowed: anyhow::Error = SyncError::DirectionNotAllowed {
            project: ProjectName::from("x"),
            operation: Operation::Push,
            mode: SyncMode::PullOnly,
        }
        .into();
        assert_eq!(exit_code(&not_allowed.context("push failed")), EXIT_NOT_ALLOWED);

        let transfer: anyhow::Error = SyncError::TransferFailed {
            tool: "rsync".into(),
            status: Some(255),
            stderr: String::new(),
        }
        .into();
        assert_eq!(exit_code(&transfer), EXIT_OPERATION);
    }
}
