//! Error types for sessync-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Direction;

/// All errors that can arise while loading or validating configuration.
///
/// Every variant is fatal: the caller reports it and takes no action.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying I/O failure while reading the configuration file.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parse error, including missing required keys and wrong types.
    #[error("failed to parse configuration at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("configuration not found at {path}")]
    NotFound { path: PathBuf },

    /// `dirs::home_dir()` returned `None`.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// A required string field is empty.
    #[error("`{field}` must not be empty")]
    EmptyField { field: String },

    /// Two projects share a name.
    #[error("duplicate project name '{name}'")]
    DuplicateProject { name: String },

    /// A project's `mode` is not one of `pull`, `push`, `both`.
    #[error("project '{project}' has invalid mode '{mode}'; expected: pull, push, both")]
    InvalidMode { project: String, mode: String },

    /// A rewrite rule has an empty side.
    #[error("rewrite rule #{index} has an empty `{side}` side")]
    EmptyRule { index: usize, side: &'static str },

    /// Two rewrite rules interfere with each other within one direction.
    #[error("rewrite rules collide ({direction}): {detail}")]
    RuleCollision { direction: Direction, detail: String },

    /// No enabled project with this name is configured.
    #[error("project '{name}' not found or disabled")]
    ProjectNotFound { name: String },
}

/// Convenience constructor for [`ConfigError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.into(),
        source,
    }
}
