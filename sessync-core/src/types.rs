//! Domain types for sessync.
//!
//! All path fields use `PathBuf`. Types that appear in command output are
//! serializable with serde; the on-disk file format lives in [`crate::registry`].

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::rules::RewriteRule;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed project name, the unique key of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProjectName(pub String);

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ProjectName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which side is the source of truth for a rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    RemoteToLocal,
    LocalToRemote,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::RemoteToLocal => write!(f, "remote-to-local"),
            Direction::LocalToRemote => write!(f, "local-to-remote"),
        }
    }
}

/// A single sync request against one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Pull,
    Push,
}

impl Operation {
    /// Rewrite direction applied to the staged copy.
    pub fn direction(self) -> Direction {
        match self {
            Operation::Pull => Direction::RemoteToLocal,
            Operation::Push => Direction::LocalToRemote,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Pull => write!(f, "pull"),
            Operation::Push => write!(f, "push"),
        }
    }
}

/// The directions a project is allowed to sync in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum SyncMode {
    #[default]
    #[serde(rename = "pull")]
    PullOnly,
    #[serde(rename = "push")]
    PushOnly,
    #[serde(rename = "both")]
    Bidirectional,
}

impl SyncMode {
    /// Parse a configured mode. The original tool's spellings are accepted too.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pull" | "server-to-mac" => Some(SyncMode::PullOnly),
            "push" | "mac-to-server" => Some(SyncMode::PushOnly),
            "both" | "bidirectional" => Some(SyncMode::Bidirectional),
            _ => None,
        }
    }

    pub fn allows(self, operation: Operation) -> bool {
        matches!(
            (self, operation),
            (SyncMode::Bidirectional, _)
                | (SyncMode::PullOnly, Operation::Pull)
                | (SyncMode::PushOnly, Operation::Push)
        )
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::PullOnly => write!(f, "pull"),
            SyncMode::PushOnly => write!(f, "push"),
            SyncMode::Bidirectional => write!(f, "both"),
        }
    }
}

// ---------------------------------------------------------------------------
// Domain structs
// ---------------------------------------------------------------------------

/// A named mapping between one remote directory and one local directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub name: ProjectName,
    /// Directory name under the remote root.
    pub remote_dir: String,
    /// Directory name under the local root.
    pub local_dir: String,
    pub mode: SyncMode,
    pub enabled: bool,
}

/// External command names used for transfer and remote execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tools {
    pub rsync: String,
    pub ssh: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            rsync: "rsync".to_string(),
            ssh: "ssh".to_string(),
        }
    }
}

/// Validated configuration, constructed once and passed to every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// SSH alias of the remote host.
    pub remote_alias: String,
    pub local_root: PathBuf,
    /// Remote root, kept as a string: it names a path on another machine.
    pub remote_root: String,
    pub rewrite_rules: Vec<RewriteRule>,
    pub projects: Vec<Project>,
    /// Extension (without the dot) of the files whose content is rewritten.
    pub content_extension: String,
    /// Parent directory of staging areas.
    pub staging_root: PathBuf,
    /// Pass the transfer tool's delete-extraneous flag.
    pub delete_extraneous: bool,
    pub tools: Tools,
}

impl Config {
    /// Resolve an enabled project by name.
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects
            .iter()
            .find(|p| p.name.0 == name && p.enabled)
    }

    /// `<localRoot>/<localDir>` for a project.
    pub fn local_path(&self, project: &Project) -> PathBuf {
        self.local_root.join(&project.local_dir)
    }

    /// `<remoteRoot>/<remoteDir>` for a project.
    pub fn remote_path(&self, project: &Project) -> String {
        format!(
            "{}/{}",
            self.remote_root.trim_end_matches('/'),
            project.remote_dir
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
