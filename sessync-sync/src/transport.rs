//! External transfer and remote-execution primitives.
//!
//! Both are black boxes invoked through [`std::process::Command`]. The
//! orchestrator only sees the [`Transfer`] and [`RemoteShell`] traits, so tests
//! can substitute recording fakes.

use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

use sessync_core::Tools;

use crate::error::SyncError;

/// One side of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Local(PathBuf),
    Remote { host: String, path: String },
}

impl Endpoint {
    pub fn is_remote(&self) -> bool {
        matches!(self, Endpoint::Remote { .. })
    }

    /// rsync argument form. A trailing `/` on a source means "contents of".
    fn to_arg(&self, contents_of: bool) -> String {
        let mut arg = match self {
            Endpoint::Local(path) => path.display().to_string(),
            Endpoint::Remote { host, path } => format!("{host}:{path}"),
        };
        if contents_of && !arg.ends_with('/') {
            arg.push('/');
        }
        arg
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_arg(false))
    }
}

/// A directory copy: the contents of `source` into `destination`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub source: Endpoint,
    pub destination: Endpoint,
    /// Remove destination files absent from the source.
    pub delete_extraneous: bool,
    /// Report what would change without changing anything.
    pub dry_run: bool,
}

/// Copies directory contents between endpoints.
pub trait Transfer {
    /// Name of the underlying tool (for logging and errors).
    fn name(&self) -> &str;

    /// Perform the transfer, returning the tool's standard output.
    fn transfer(&self, request: &TransferRequest) -> Result<String, SyncError>;
}

/// Runs commands on the remote host.
pub trait RemoteShell {
    /// Names of the entries of a remote directory.
    fn list_dir(&self, host: &str, path: &str) -> Result<Vec<String>, SyncError>;
}

// ---------------------------------------------------------------------------
// rsync
// ---------------------------------------------------------------------------

/// [`Transfer`] backed by `rsync` over `ssh`.
#[derive(Debug, Clone)]
pub struct RsyncTransfer {
    program: String,
    ssh: String,
}

impl RsyncTransfer {
    pub fn new(tools: &Tools) -> Self {
        Self {
            program: tools.rsync.clone(),
            ssh: tools.ssh.clone(),
        }
    }

    /// Full argument list for a request.
    pub fn args(&self, request: &TransferRequest) -> Vec<String> {
        let mut args = vec!["-a".to_string()];
        if request.source.is_remote() || request.destination.is_remote() {
            args.push("-z".to_string());
            args.push("-e".to_string());
            args.push(self.ssh.clone());
        }
        if request.delete_extraneous {
            args.push("--delete".to_string());
        }
        if request.dry_run {
            args.push("--dry-run".to_string());
            args.push("--itemize-changes".to_string());
        }
        args.push(request.source.to_arg(true));
        args.push(request.destination.to_arg(false));
        args
    }
}

impl Transfer for RsyncTransfer {
    fn name(&self) -> &str {
        &self.program
    }

    fn transfer(&self, request: &TransferRequest) -> Result<String, SyncError> {
        let args = self.args(request);
        tracing::debug!(program = %self.program, args = ?args, "running transfer");

        let output = run(Command::new(&self.program).args(&args), &self.program)?;
        if !output.status.success() {
            return Err(SyncError::TransferFailed {
                tool: self.program.clone(),
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ---------------------------------------------------------------------------
// ssh
// ---------------------------------------------------------------------------

/// [`RemoteShell`] backed by `ssh`.
#[derive(Debug, Clone)]
pub struct SshShell {
    program: String,
}

impl SshShell {
    pub fn new(tools: &Tools) -> Self {
        Self {
            program: tools.ssh.clone(),
        }
    }
}

impl RemoteShell for SshShell {
    fn list_dir(&self, host: &str, path: &str) -> Result<Vec<String>, SyncError> {
        let command = format!("ls -1 {}", shell_quote(path));
        tracing::debug!(program = %self.program, host, command = %command, "running remote command");

        let output = run(
            Command::new(&self.program).arg(host).arg(&command),
            &self.program,
        )?;
        if !output.status.success() {
            return Err(SyncError::RemoteCommandFailed {
                command,
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(parse_listing(&String::from_utf8_lossy(&output.stdout)))
    }
}

fn run(command: &mut Command, program: &str) -> Result<Output, SyncError> {
    command
        .stdin(Stdio::null())
        .output()
        .map_err(|source| SyncError::Spawn {
            program: program.to_string(),
            source,
        })
}

/// Non-empty trimmed lines of `ls -1` output.
pub(crate) fn parse_listing(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Single-quote `raw` for a POSIX shell.
pub(crate) fn shell_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
