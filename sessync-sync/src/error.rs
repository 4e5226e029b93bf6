//! Error types for sessync-sync.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use sessync_core::{ConfigError, Operation, ProjectName, SyncMode};

/// All errors that can arise from sync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Configuration problem, including an unknown project.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The project's mode does not permit the operation.
    #[error("project '{project}' is configured as '{mode}' and does not allow {operation}")]
    DirectionNotAllowed {
        project: ProjectName,
        operation: Operation,
        mode: SyncMode,
    },

    /// The transfer primitive exited non-zero.
    #[error("{tool} failed ({}): {stderr}", exit_status(.status))]
    TransferFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    /// A remote command exited non-zero.
    #[error("remote command `{command}` failed ({}): {stderr}", exit_status(.status))]
    RemoteCommandFailed {
        command: String,
        status: Option<i32>,
        stderr: String,
    },

    /// An external program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// At least one project of a batch failed.
    #[error("{} of {attempted} sync operations failed:\n{}", .failures.len(), list_failures(.failures))]
    BatchFailed {
        attempted: usize,
        failures: Vec<BatchFailure>,
    },
}

/// One failed attempt within a batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub project: ProjectName,
    pub operation: Operation,
    pub error: SyncError,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.operation, self.project, self.error)
    }
}

fn list_failures(failures: &[BatchFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("  - {failure}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn exit_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
