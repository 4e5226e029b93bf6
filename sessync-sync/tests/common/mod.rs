//! Shared fixtures: a configuration rooted in temp dirs and a recording
//! transfer fake that copies between local directories.

#![allow(dead_code)]

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use sessync_core::{Config, Project, ProjectName, RewriteRule, SyncMode, Tools};
use sessync_sync::{Endpoint, SyncError, Transfer, TransferRequest};
use tempfile::TempDir;

/// Remote root, local root and staging root, all on the local disk.
pub struct Sandbox {
    pub remote: TempDir,
    pub local: TempDir,
    pub staging: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            remote: TempDir::new().expect("remote"),
            local: TempDir::new().expect("local"),
            staging: TempDir::new().expect("staging"),
        }
    }

    pub fn config(&self, projects: Vec<Project>) -> Config {
        Config {
            remote_alias: "devbox".into(),
            local_root: self.local.path().to_path_buf(),
            remote_root: self.remote.path().display().to_string(),
            rewrite_rules: rules(),
            projects,
            content_extension: "jsonl".into(),
            staging_root: self.staging.path().to_path_buf(),
            delete_extraneous: true,
            tools: Tools::default(),
        }
    }

    pub fn remote_dir(&self, project: &Project) -> PathBuf {
        self.remote.path().join(&project.remote_dir)
    }

    pub fn local_dir(&self, project: &Project) -> PathBuf {
        self.local.path().join(&project.local_dir)
    }

    /// No staging area survives a run.
    pub fn assert_staging_clean(&self) {
        let leftovers: Vec<_> = fs::read_dir(self.staging.path())
            .expect("read staging root")
            .collect();
        assert!(leftovers.is_empty(), "staging areas left behind: {leftovers:?}");
    }
}

pub fn rules() -> Vec<RewriteRule> {
    vec![
        RewriteRule::new("/home/user/.claude/projects", "/Users/user/.claude/projects"),
        RewriteRule::new("-var-tmp", "-private-var"),
        RewriteRule::new("-var-tmp-vibe", "-private-var-folders-vibe"),
    ]
}

pub fn project(name: &str, mode: SyncMode) -> Project {
    Project {
        name: ProjectName::from(name),
        remote_dir: format!("-var-tmp-{name}"),
        local_dir: format!("-private-var-{name}"),
        mode,
        enabled: true,
    }
}

pub fn write(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, content).expect("write");
}

/// Records every request and copies directory contents for real.
///
/// Remote endpoints are interpreted as local paths. Sources whose path
/// contains one of `fail_on` fail like a non-zero exit.
#[derive(Default)]
pub struct FakeTransfer {
    pub requests: RefCell<Vec<TransferRequest>>,
    pub fail_on: Vec<String>,
}

impl FakeTransfer {
    pub fn failing_on(fragment: &str) -> Self {
        Self {
            fail_on: vec![fragment.to_string()],
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.borrow().len()
    }
}

fn resolve(endpoint: &Endpoint) -> PathBuf {
    match endpoint {
        Endpoint::Local(path) => path.clone(),
        Endpoint::Remote { path, .. } => PathBuf::from(path),
    }
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}

impl Transfer for FakeTransfer {
    fn name(&self) -> &str {
        "fake"
    }

    fn transfer(&self, request: &TransferRequest) -> Result<String, SyncError> {
        self.requests.borrow_mut().push(request.clone());
        let source = resolve(&request.source);
        let destination = resolve(&request.destination);

        let source_text = source.display().to_string();
        if self.fail_on.iter().any(|f| source_text.contains(f.as_str())) {
            return Err(SyncError::TransferFailed {
                tool: "fake".into(),
                status: Some(12),
                stderr: format!("connection closed reading {source_text}"),
            });
        }
        if request.dry_run {
            return Ok(format!(">f+++++++++ {}\n", destination.display()));
        }
        copy_tree(&source, &destination).map_err(|e| SyncError::TransferFailed {
            tool: "fake".into(),
            status: Some(23),
            stderr: e.to_string(),
        })?;
        Ok(String::new())
    }
}
