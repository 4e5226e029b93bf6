//! Single-project sync: validate, stage, rewrite, finalize.
//!
//! ```text
//! Validating ─▶ Staging ─▶ Rewriting ─▶ Finalizing ─▶ Done
//!      └───────────┴───────────┴────────────┴─────▶ Failed
//! ```
//!
//! The staging area is a [`tempfile::TempDir`] owned by the run; it is removed
//! when the run returns, on every path.

use std::fs;

use tempfile::TempDir;

use sessync_core::{Config, ConfigError, Operation, Project, ProjectName, RuleSet};

use crate::error::{io_err, SyncError};
use crate::gate::{confirmation_for, Confirm, Confirmation, Prompt};
use crate::transport::{Endpoint, Transfer, TransferRequest};
use crate::walker::{rewrite_tree, TransformResult};

/// Per-invocation switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Finalize with the transfer tool's dry-run flag.
    pub dry_run: bool,
    /// Skip the ordinary push confirmation.
    pub assume_yes: bool,
}

/// Summary of a completed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub project: ProjectName,
    pub operation: Operation,
    pub transform: TransformResult,
    pub dry_run: bool,
    /// Where the project landed; `transform.skipped` is relative to it.
    pub destination: Endpoint,
    /// Standard output of the finalizing transfer (the itemized list in dry-run).
    pub transfer_output: String,
}

/// How an operation ended when it did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Completed(SyncReport),
    /// The user answered "no" to an ordinary confirmation.
    Declined,
}

/// Runs sync operations against one configuration.
pub struct Orchestrator<'a> {
    config: &'a Config,
    transfer: &'a dyn Transfer,
    confirm: &'a dyn Confirm,
    options: SyncOptions,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: &'a Config,
        transfer: &'a dyn Transfer,
        confirm: &'a dyn Confirm,
        options: SyncOptions,
    ) -> Self {
        Self {
            config,
            transfer,
            confirm,
            options,
        }
    }

    pub fn config(&self) -> &Config {
        self.config
    }

    /// Pull or push the named project.
    pub fn run(&self, name: &str, operation: Operation) -> Result<SyncOutcome, SyncError> {
        let project = self
            .config
            .project(name)
            .ok_or_else(|| ConfigError::ProjectNotFound {
                name: name.to_string(),
            })?;
        self.run_project(project, operation)
    }

    pub(crate) fn run_project(
        &self,
        project: &Project,
        operation: Operation,
    ) -> Result<SyncOutcome, SyncError> {
        // Validating
        if !self.validate(project, operation)? {
            tracing::info!(project = %project.name, %operation, "declined by user");
            return Ok(SyncOutcome::Declined);
        }

        let (source, destination) = self.endpoints(project, operation);
        tracing::info!(
            project = %project.name,
            %operation,
            tool = self.transfer.name(),
            from = %source,
            to = %destination,
            "sync started"
        );

        // Staging
        let staging = self.create_staging(project, operation)?;
        let staged = Endpoint::Local(staging.path().to_path_buf());
        self.transfer.transfer(&TransferRequest {
            source,
            destination: staged.clone(),
            delete_extraneous: self.config.delete_extraneous,
            dry_run: false,
        })?;

        // Rewriting
        let rules = RuleSet::build(&self.config.rewrite_rules, operation.direction());
        let transform = rewrite_tree(staging.path(), &rules, &self.config.content_extension)?;

        // Finalizing
        if let Endpoint::Local(dir) = &destination {
            if !self.options.dry_run {
                fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
            }
        }
        let transfer_output = self.transfer.transfer(&TransferRequest {
            source: staged,
            destination: destination.clone(),
            delete_extraneous: self.config.delete_extraneous,
            dry_run: self.options.dry_run,
        })?;

        close_staging(staging);
        tracing::info!(project = %project.name, %operation, changed = transform.files_changed, "sync finished");

        Ok(SyncOutcome::Completed(SyncReport {
            project: project.name.clone(),
            operation,
            transform,
            dry_run: self.options.dry_run,
            destination,
            transfer_output,
        }))
    }

    /// `Ok(false)` when the user declined an ordinary confirmation.
    fn validate(&self, project: &Project, operation: Operation) -> Result<bool, SyncError> {
        let not_allowed = || SyncError::DirectionNotAllowed {
            project: project.name.clone(),
            operation,
            mode: project.mode,
        };

        match confirmation_for(operation, project.mode, self.options.assume_yes) {
            Confirmation::NotRequired => Ok(true),
            Confirmation::Forbidden => Err(not_allowed()),
            confirmation @ Confirmation::Required => {
                let prompt = Prompt::for_operation(project, operation, confirmation);
                Ok(self.confirm.confirm(&prompt))
            }
            confirmation @ Confirmation::Mandatory => {
                let prompt = Prompt::for_operation(project, operation, confirmation);
                if self.confirm.confirm(&prompt) {
                    tracing::warn!(project = %project.name, %operation, mode = %project.mode, "proceeding against configured mode");
                    Ok(true)
                } else {
                    Err(not_allowed())
                }
            }
        }
    }

    fn endpoints(&self, project: &Project, operation: Operation) -> (Endpoint, Endpoint) {
        let local = Endpoint::Local(self.config.local_path(project));
        let remote = Endpoint::Remote {
            host: self.config.remote_alias.clone(),
            path: self.config.remote_path(project),
        };
        match operation {
            Operation::Pull => (remote, local),
            Operation::Push => (local, remote),
        }
    }

    fn create_staging(&self, project: &Project, operation: Operation) -> Result<TempDir, SyncError> {
        let root = &self.config.staging_root;
        fs::create_dir_all(root).map_err(|e| io_err(root, e))?;
        tempfile::Builder::new()
            .prefix(&format!("sessync-{}-{operation}-", sanitize(&project.name.0)))
            .tempdir_in(root)
            .map_err(|e| io_err(root, e))
    }
}

/// Remove the staging area, logging instead of failing.
fn close_staging(staging: TempDir) {
    let path = staging.path().to_path_buf();
    if let Err(err) = staging.close() {
        tracing::warn!(path = %path.display(), error = %err, "failed to remove staging area");
    }
}

/// Keep a project name usable as part of a directory name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
