//! Registry load, validation and error-message tests.

use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;
use sessync_core::{
    registry::{self, ConfigSource},
    ConfigError, Direction, SyncMode,
};
use std::path::Path;

fn config_json(rules: &str, projects: &str) -> String {
    format!(
        r#"{{
  "remoteAlias": "devbox",
  "paths": {{ "localRoot": "~/.claude/projects", "remoteRoot": "/home/user/.claude/projects" }},
  "rewriteRules": [{rules}],
  "projects": [{projects}]
}}"#
    )
}

const RULES: &str = r#"
    { "remote": "/home/user", "mac": "/Users/user" },
    { "server": "-var-tmp", "local": "-private-var" }
"#;

const PROJECTS: &str = r#"
    { "name": "api", "server_dir": "-home-user-api", "macos_dir": "-Users-user-api", "mode": "pull" },
    { "name": "web", "server_dir": "-home-user-web", "macos_dir": "-Users-user-web", "mode": "both", "enabled": false }
"#;

fn parse(json: &str) -> Result<sessync_core::Config, ConfigError> {
    registry::parse_at(Path::new("/home/tester"), Path::new("config.json"), json)
}

// ---------------------------------------------------------------------------
// 1. Loading
// ---------------------------------------------------------------------------

#[test]
fn loads_user_config_from_home() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child(".sessync").child("config.json");
    file.write_str(&config_json(RULES, PROJECTS)).expect("write");

    let loaded = registry::load_at(home.path(), None).expect("load");
    assert_eq!(loaded.source, ConfigSource::File(file.path().to_path_buf()));
    assert_eq!(loaded.config.projects.len(), 2);
    assert_eq!(
        loaded.config.local_root,
        home.path().join(".claude").join("projects")
    );
}

#[test]
fn explicit_path_must_exist() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let missing = home.child("nope.json");
    let err = registry::load_at(home.path(), Some(missing.path())).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn explicit_path_wins_over_home_config() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    home.child(".sessync")
        .child("config.json")
        .write_str("not json at all")
        .expect("write");
    let explicit = home.child("other.json");
    explicit.write_str(&config_json(RULES, PROJECTS)).expect("write");

    let loaded = registry::load_at(home.path(), Some(explicit.path())).expect("load");
    assert_eq!(loaded.source, ConfigSource::File(explicit.path().to_path_buf()));
}

#[test]
fn corrupt_json_returns_parse_error_with_path() {
    let home = assert_fs::TempDir::new().expect("tempdir");
    let file = home.child(".sessync").child("config.json");
    file.write_str("{ \"remoteAlias\": ").expect("write");

    let err = registry::load_at(home.path(), None).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(err.to_string().contains("config.json"));
    file.assert(predicate::path::exists());
}

#[test]
fn missing_top_level_key_is_a_parse_error() {
    let err = parse(r#"{ "remoteAlias": "devbox", "projects": [] }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Validation
// ---------------------------------------------------------------------------

#[test]
fn field_aliases_and_defaults() {
    let config = parse(&config_json(RULES, PROJECTS)).expect("parse");
    assert_eq!(config.rewrite_rules[1].remote, "-var-tmp");
    assert_eq!(config.rewrite_rules[1].local, "-private-var");
    assert_eq!(config.content_extension, "jsonl");
    assert_eq!(config.tools.rsync, "rsync");
    assert!(!config.projects[1].enabled);
    assert!(config.project("web").is_none(), "disabled projects do not resolve");
    assert!(config.project("api").is_some());
}

#[rstest]
#[case("pull", SyncMode::PullOnly)]
#[case("push", SyncMode::PushOnly)]
#[case("both", SyncMode::Bidirectional)]
#[case("server-to-mac", SyncMode::PullOnly)]
#[case("bidirectional", SyncMode::Bidirectional)]
fn accepts_modes(#[case] raw: &str, #[case] expected: SyncMode) {
    let projects = format!(
        r#"{{ "name": "api", "server_dir": "a", "macos_dir": "b", "mode": "{raw}" }}"#
    );
    let config = parse(&config_json(RULES, &projects)).expect("parse");
    assert_eq!(config.projects[0].mode, expected);
}

#[test]
fn rejects_invalid_mode() {
    let projects = r#"{ "name": "api", "server_dir": "a", "macos_dir": "b", "mode": "sideways" }"#;
    let err = parse(&config_json(RULES, projects)).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidMode { .. }), "got: {err}");
    assert!(err.to_string().contains("sideways"));
}

#[test]
fn rejects_duplicate_project_names() {
    let projects = r#"
        { "name": "api", "server_dir": "a", "macos_dir": "b", "mode": "pull" },
        { "name": "api", "server_dir": "c", "macos_dir": "d", "mode": "push" }
    "#;
    let err = parse(&config_json(RULES, projects)).unwrap_err();
    assert!(
        matches!(&err, ConfigError::DuplicateProject { name } if name == "api"),
        "got: {err}"
    );
}

#[rstest]
#[case(r#"{ "remote": "", "mac": "/Users/user" }"#, "remote")]
#[case(r#"{ "remote": "/home/user", "mac": "" }"#, "mac")]
fn rejects_empty_rule_sides(#[case] rule: &str, #[case] expected_side: &str) {
    let err = parse(&config_json(rule, PROJECTS)).unwrap_err();
    match err {
        ConfigError::EmptyRule { index, side } => {
            assert_eq!(index, 0);
            assert_eq!(side, expected_side);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn equal_sided_rule_is_accepted() {
    let rules = r#"{ "remote": "/opt/shared", "mac": "/opt/shared" }"#;
    let config = parse(&config_json(rules, PROJECTS)).expect("parse");
    assert_eq!(config.rewrite_rules.len(), 1);
}

#[test]
fn rejects_empty_project_dir() {
    let projects = r#"{ "name": "api", "server_dir": "", "macos_dir": "b", "mode": "pull" }"#;
    let err = parse(&config_json(RULES, projects)).unwrap_err();
    assert!(err.to_string().contains("projects[0].server_dir"), "got: {err}");
}

#[test]
fn rejects_colliding_rules() {
    let rules = r#"
        { "remote": "/srv/work", "mac": "/Users/me/srv-data" },
        { "remote": "srv-data", "mac": "local-data" }
    "#;
    let err = parse(&config_json(rules, PROJECTS)).unwrap_err();
    match &err {
        ConfigError::RuleCollision { direction, detail } => {
            assert_eq!(*direction, Direction::RemoteToLocal);
            assert!(detail.contains("srv-data"), "detail: {detail}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn optional_settings_are_honoured() {
    let json = r#"{
      "remoteAlias": "devbox",
      "paths": { "localRoot": "/data/local", "remoteRoot": "/data/remote" },
      "rewriteRules": [],
      "projects": [],
      "contentExtension": ".ndjson",
      "stagingRoot": "~/scratch",
      "deleteExtraneous": false,
      "tools": { "rsync": "/opt/bin/rsync" }
    }"#;
    let config = parse(json).expect("parse");
    assert_eq!(config.content_extension, "ndjson");
    assert_eq!(config.staging_root, Path::new("/home/tester/scratch"));
    assert!(!config.delete_extraneous);
    assert_eq!(config.tools.rsync, "/opt/bin/rsync");
    assert_eq!(config.tools.ssh, "ssh");
}
