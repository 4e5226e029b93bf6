//! Project registry: load and validate the JSON configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.sessync/
//!   config.json     (user configuration)
//! ```
//!
//! When no user configuration exists, the example bundled with this crate is
//! used instead and the caller is told so through [`ConfigSource::Bundled`].
//!
//! # API pattern
//!
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{io_err, ConfigError};
use crate::rules::{RewriteRule, RuleSet};
use crate::types::{Config, Direction, Project, ProjectName, SyncMode, Tools};

/// Example configuration shipped with the binary.
pub const BUNDLED_EXAMPLE: &str = include_str!("../config.example.json");

const DEFAULT_EXTENSION: &str = "jsonl";

// ---------------------------------------------------------------------------
// 1. File format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    remote_alias: String,
    paths: PathsFile,
    rewrite_rules: Vec<RuleFile>,
    projects: Vec<ProjectFile>,
    #[serde(default)]
    content_extension: Option<String>,
    #[serde(default)]
    staging_root: Option<String>,
    #[serde(default = "default_true")]
    delete_extraneous: bool,
    #[serde(default)]
    tools: ToolsFile,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathsFile {
    local_root: String,
    remote_root: String,
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(alias = "server")]
    remote: String,
    #[serde(alias = "local")]
    mac: String,
}

#[derive(Debug, Deserialize)]
struct ProjectFile {
    name: String,
    server_dir: String,
    macos_dir: String,
    mode: String,
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ToolsFile {
    rsync: Option<String>,
    ssh: Option<String>,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// 2. Locations
// ---------------------------------------------------------------------------

/// Where a loaded configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// No user configuration exists; the bundled example was used.
    Bundled,
}

/// A validated configuration and its origin.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub source: ConfigSource,
}

/// `<home>/.sessync/` — pure, no I/O.
pub fn config_dir_at(home: &Path) -> PathBuf {
    home.join(".sessync")
}

/// `<home>/.sessync/config.json` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    config_dir_at(home).join("config.json")
}

// ---------------------------------------------------------------------------
// 3. Load
// ---------------------------------------------------------------------------

/// Load and validate configuration.
///
/// An `explicit` path must exist. Otherwise `<home>/.sessync/config.json` is
/// used, falling back to [`BUNDLED_EXAMPLE`] when it is absent.
pub fn load_at(home: &Path, explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => {
            let path = config_path_at(home);
            if !path.exists() {
                tracing::warn!(
                    path = %path.display(),
                    "no configuration found, using the bundled example"
                );
                let config = parse_at(home, Path::new("<bundled example>"), BUNDLED_EXAMPLE)?;
                return Ok(LoadedConfig {
                    config,
                    source: ConfigSource::Bundled,
                });
            }
            path
        }
    };

    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let config = parse_at(home, &path, &contents)?;
    tracing::debug!(path = %path.display(), projects = config.projects.len(), "configuration loaded");
    Ok(LoadedConfig {
        config,
        source: ConfigSource::File(path),
    })
}

/// `load_at` convenience wrapper.
pub fn load(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    load_at(&home()?, explicit)
}

/// Parse and validate configuration text. `origin` is only used in errors.
pub fn parse_at(home: &Path, origin: &Path, contents: &str) -> Result<Config, ConfigError> {
    let file: ConfigFile = serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
        path: origin.to_path_buf(),
        source: e,
    })?;
    validate(home, file)
}

// ---------------------------------------------------------------------------
// 4. Validation
// ---------------------------------------------------------------------------

fn validate(home: &Path, file: ConfigFile) -> Result<Config, ConfigError> {
    non_empty("remoteAlias", &file.remote_alias)?;
    non_empty("paths.localRoot", &file.paths.local_root)?;
    non_empty("paths.remoteRoot", &file.paths.remote_root)?;

    let rewrite_rules = validate_rules(&file.rewrite_rules)?;
    let projects = validate_projects(file.projects)?;

    let content_extension = file
        .content_extension
        .map(|ext| ext.trim_start_matches('.').to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());
    non_empty("contentExtension", &content_extension)?;

    let staging_root = match file.staging_root.as_deref() {
        Some(root) => expand_home(home, root),
        None => std::env::temp_dir(),
    };

    let defaults = Tools::default();
    let tools = Tools {
        rsync: file.tools.rsync.unwrap_or(defaults.rsync),
        ssh: file.tools.ssh.unwrap_or(defaults.ssh),
    };

    Ok(Config {
        remote_alias: file.remote_alias,
        local_root: expand_home(home, &file.paths.local_root),
        remote_root: file.paths.remote_root,
        rewrite_rules,
        projects,
        content_extension,
        staging_root,
        delete_extraneous: file.delete_extraneous,
        tools,
    })
}

fn validate_rules(raw: &[RuleFile]) -> Result<Vec<RewriteRule>, ConfigError> {
    let mut rules = Vec::with_capacity(raw.len());
    for (index, rule) in raw.iter().enumerate() {
        if rule.remote.is_empty() {
            return Err(ConfigError::EmptyRule {
                index,
                side: "remote",
            });
        }
        if rule.mac.is_empty() {
            return Err(ConfigError::EmptyRule { index, side: "mac" });
        }
        if rule.remote == rule.mac {
            tracing::warn!(rule = index, pattern = %rule.remote, "rewrite rule has equal sides and is ignored");
        }
        rules.push(RewriteRule::new(rule.remote.clone(), rule.mac.clone()));
    }

    for direction in [Direction::RemoteToLocal, Direction::LocalToRemote] {
        let collisions = RuleSet::build(&rules, direction).collisions();
        if !collisions.is_empty() {
            let detail = collisions
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ConfigError::RuleCollision { direction, detail });
        }
    }
    Ok(rules)
}

fn validate_projects(raw: Vec<ProjectFile>) -> Result<Vec<Project>, ConfigError> {
    let mut seen = HashSet::new();
    let mut projects = Vec::with_capacity(raw.len());
    for (index, project) in raw.into_iter().enumerate() {
        non_empty(&format!("projects[{index}].name"), &project.name)?;
        non_empty(&format!("projects[{index}].server_dir"), &project.server_dir)?;
        non_empty(&format!("projects[{index}].macos_dir"), &project.macos_dir)?;

        if !seen.insert(project.name.clone()) {
            return Err(ConfigError::DuplicateProject { name: project.name });
        }
        let mode = SyncMode::parse(&project.mode).ok_or_else(|| ConfigError::InvalidMode {
            project: project.name.clone(),
            mode: project.mode.clone(),
        })?;

        projects.push(Project {
            name: ProjectName::from(project.name),
            remote_dir: project.server_dir,
            local_dir: project.macos_dir,
            mode,
            enabled: project.enabled,
        });
    }
    Ok(projects)
}

fn non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Expand a leading `~` to `home`.
fn expand_home(home: &Path, raw: &str) -> PathBuf {
    if raw == "~" {
        home.to_path_buf()
    } else if let Some(rest) = raw.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(raw)
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn home() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
