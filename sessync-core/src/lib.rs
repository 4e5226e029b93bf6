//! sessync core library — domain types, configuration registry, rewrite engine.
//!
//! - [`types`] — newtypes, enums and the validated [`Config`]
//! - [`rules`] — [`RewriteRule`], [`RuleSet`] and [`rewrite`]
//! - [`registry`] — load / validate configuration
//! - [`error`] — [`ConfigError`]

pub mod error;
pub mod registry;
pub mod rules;
pub mod types;

pub use error::ConfigError;
pub use registry::{ConfigSource, LoadedConfig};
pub use rules::{rewrite, Collision, RewriteRule, RuleSet};
pub use types::{Config, Direction, Operation, Project, ProjectName, SyncMode, Tools};
