//! Tree walker: rewrite every content file under a root in place.
//!
//! ## Per-file protocol
//!
//! 1. Read the file as bytes; on failure warn, record as skipped, move on.
//! 2. Decode as UTF-8; on failure warn, record as skipped, move on.
//! 3. Apply the rule set; stop if nothing changed (bytes and mtime untouched).
//! 4. Write to `<path>.sessync.tmp`.
//! 5. Rename to the final path (atomic on POSIX).

use std::fs;
use std::path::{Path, PathBuf};

use sessync_core::RuleSet;

use crate::error::{io_err, SyncError};

/// Suffix of the sibling file used for atomic write-back.
const TMP_SUFFIX: &str = ".sessync.tmp";

/// Side-effect summary of one walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformResult {
    /// Content files seen, including undecodable ones.
    pub files_visited: usize,
    /// Files whose content was rewritten.
    pub files_changed: usize,
    /// Files that could not be read as UTF-8 text and were left untouched,
    /// relative to the walk root.
    pub skipped: Vec<PathBuf>,
}

/// Rewrite every `*.<extension>` file under `root`, recursively.
///
/// Symlinks are not followed. Files are processed in name order. Only an
/// unreadable `root` or a failed write-back is an error; unreadable
/// subdirectories and files are logged and skipped.
pub fn rewrite_tree(
    root: &Path,
    rules: &RuleSet,
    extension: &str,
) -> Result<TransformResult, SyncError> {
    let mut files = Vec::new();
    let mut result = TransformResult::default();
    let entries = read_sorted(root)?;
    collect_files(entries, extension, &mut files, &mut result.skipped);

    for path in files {
        result.files_visited += 1;
        match rewrite_file(&path, rules)? {
            FileOutcome::Changed => result.files_changed += 1,
            FileOutcome::Unchanged => {}
            FileOutcome::Unreadable => result.skipped.push(path),
        }
    }
    result.skipped = result
        .skipped
        .into_iter()
        .map(|path| relative_to(root, path))
        .collect();

    tracing::info!(
        root = %root.display(),
        direction = %rules.direction(),
        visited = result.files_visited,
        changed = result.files_changed,
        skipped = result.skipped.len(),
        "rewrite pass complete"
    );
    Ok(result)
}

fn read_sorted(dir: &Path) -> Result<Vec<fs::DirEntry>, SyncError> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .collect::<Result<_, _>>()
        .map_err(|e| io_err(dir, e))?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn collect_files(
    entries: Vec<fs::DirEntry>,
    extension: &str,
    out: &mut Vec<PathBuf>,
    skipped: &mut Vec<PathBuf>,
) {
    for entry in entries {
        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "skipping entry of unknown type");
                skipped.push(path);
                continue;
            }
        };
        if file_type.is_dir() {
            match read_sorted(&path) {
                Ok(children) => collect_files(children, extension, out, skipped),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping unreadable directory");
                    skipped.push(path);
                }
            }
        } else if file_type.is_file() && has_extension(&path, extension) {
            out.push(path);
        }
    }
}

fn relative_to(root: &Path, path: PathBuf) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

#[derive(Debug, PartialEq, Eq)]
enum FileOutcome {
    Changed,
    Unchanged,
    Unreadable,
}

fn rewrite_file(path: &Path, rules: &RuleSet) -> Result<FileOutcome, SyncError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "skipping unreadable file");
            return Ok(FileOutcome::Unreadable);
        }
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err.utf8_error(),
                "skipping file that is not valid UTF-8"
            );
            return Ok(FileOutcome::Unreadable);
        }
    };

    let rewritten = rules.apply(&content);
    if rewritten.as_ref() == content.as_str() {
        tracing::debug!("unchanged: {}", path.display());
        return Ok(FileOutcome::Unchanged);
    }

    atomic_write(path, rewritten.as_bytes())?;
    tracing::debug!("rewrote: {}", path.display());
    Ok(FileOutcome::Changed)
}

fn atomic_write(path: &Path, content: &[u8]) -> Result<(), SyncError> {
    let tmp = PathBuf::from(format!("{}{TMP_SUFFIX}", path.display()));
    atomic_write_with_tmp(path, content, &tmp)
}

fn atomic_write_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<(), SyncError> {
    fs::write(tmp, content).map_err(|e| io_err(tmp, e))?;
    if let Ok(metadata) = fs::metadata(path) {
        // Keep the original mode so the transfer tool does not see a permission change.
        if let Err(err) = fs::set_permissions(tmp, metadata.permissions()) {
            tracing::warn!(path = %path.display(), error = %err, "could not preserve permissions");
        }
    }
    if let Err(e) = fs::rename(tmp, path) {
        let _ = fs::remove_file(tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
