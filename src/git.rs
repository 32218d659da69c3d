//! Working-tree queries backed by the `git` CLI.
//!
//! Results are a snapshot: the tree can change between this query and the
//! command the host eventually runs.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::GitError;

/// Parent directories searched for `.git` before giving up.
const MAX_PARENT_DEPTH: usize = 50;

/// One line of `git status --porcelain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Two-character XY status code, e.g. ` M`, `A `, `??`.
    pub code: String,
    pub path: String,
}

impl StatusEntry {
    fn parse(line: &str) -> Option<Self> {
        if line.len() < 4 || !line.is_char_boundary(2) {
            return None;
        }
        let (code, rest) = line.split_at(2);
        Some(Self {
            code: code.to_string(),
            path: rest.trim_start().trim_matches('"').to_string(),
        })
    }

    pub fn is_untracked(&self) -> bool {
        self.code.contains('?')
    }
}

impl std::fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.path)
    }
}

/// Walk up from `start` to the first directory containing `.git`.
pub fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;
    start
        .ancestors()
        .take(MAX_PARENT_DEPTH)
        .find(|dir| dir.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Run `git status --porcelain` in `cwd`, optionally limited to pathspecs.
pub fn status_porcelain(cwd: &Path, pathspecs: &[&str]) -> Result<Vec<StatusEntry>, GitError> {
    let mut cmd = Command::new("git");
    cmd.args(["status", "--porcelain"]).current_dir(cwd);
    if !pathspecs.is_empty() {
        cmd.arg("--").args(pathspecs);
    }

    let output = cmd.output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("not a git repository") {
            return Err(GitError::NotARepository);
        }
        return Err(GitError::CommandFailed(format!(
            "git status exited with {}: {}",
            output.status.code().unwrap_or(-1),
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(StatusEntry::parse)
        .collect())
}

/// Tracked entries with changes, i.e. everything but `??` lines.
pub fn modified_entries(cwd: &Path, pathspecs: &[&str]) -> Result<Vec<StatusEntry>, GitError> {
    Ok(status_porcelain(cwd, pathspecs)?
        .into_iter()
        .filter(|e| !e.is_untracked())
        .collect())
}

/// Join up to `limit` items with ", " and note how many were left out.
pub fn summarize<T: std::fmt::Display>(items: &[T], limit: usize) -> String {
    let mut out = items
        .iter()
        .take(limit)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if items.len() > limit {
        out.push_str(&format!(" (+{} more)", items.len() - limit));
    }
    out
}

#[cfg(test)]
pub(crate) mod test_repo {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process::Command;
    use tempfile::TempDir;

    /// Create a throwaway repository with one committed file.
    pub fn create() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().canonicalize().unwrap();
        git(&repo_path, &["init", "-q"]);
        git(&repo_path, &["config", "user.name", "Test User"]);
        git(&repo_path, &["config", "user.email", "test@example.com"]);
        commit(&repo_path, "README.md", "hello\n", "initial");
        (temp_dir, repo_path)
    }

    pub fn git(repo: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(repo)
            .output()
            .expect("git must be installed for tests")
            .status;
        assert!(status.success(), "git {args:?} failed");
    }

    pub fn commit(repo: &Path, file: &str, content: &str, message: &str) {
        let path = repo.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        git(repo, &["add", file]);
        git(repo, &["commit", "-q", "-m", message]);
    }
}
