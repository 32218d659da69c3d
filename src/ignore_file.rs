//! Keeps the trash directory and its log out of version control.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::git::find_repo_root;

const HEADER: &str = "# safety-hooks: trash directory and log file (anywhere in repo)";

/// Make sure `<trash_dir>/` and `log_file` are listed in the `.gitignore`
/// at the root of the repository containing `cwd`.
///
/// Does nothing outside a repository. Existing entries (`TRASH` or `TRASH/`)
/// are detected before writing, so repeated calls append nothing.
/// Returns `true` when the file was changed.
pub fn ensure_entries(cwd: &Path, trash_dir: &str, log_file: &str) -> io::Result<bool> {
    let Some(root) = find_repo_root(cwd) else {
        return Ok(false);
    };
    let path = root.join(".gitignore");

    let existing = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    let trash_dir = trash_dir.trim_end_matches('/');
    let trash_entry = format!("{trash_dir}/");
    let entries: Vec<&str> = existing
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();

    let needs_trash =
        !trash_dir.is_empty() && !entries.iter().any(|e| *e == trash_dir || *e == trash_entry);
    let needs_log = !log_file.is_empty() && !entries.contains(&log_file);
    if !needs_trash && !needs_log {
        return Ok(false);
    }

    let mut block = String::new();
    if !existing.is_empty() && !existing.ends_with('\n') && !existing.ends_with('\r') {
        block.push('\n');
    }
    block.push('\n');
    block.push_str(HEADER);
    block.push('\n');
    if needs_trash {
        block.push_str(&trash_entry);
        block.push('\n');
    }
    if needs_log {
        block.push_str(log_file);
        block.push('\n');
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(block.as_bytes())?;
    log::info!("added trash entries to {}", path.display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::test_repo;

    fn count(content: &str, line: &str) -> usize {
        content.lines().filter(|l| l.trim() == line).count()
    }

    #[test]
    fn appends_both_entries() {
        let (_tmp, repo) = test_repo::create();
        assert!(ensure_entries(&repo, "TRASH", "TRASH-FILES.md").unwrap());
        let content = fs::read_to_string(repo.join(".gitignore")).unwrap();
        assert_eq!(count(&content, "TRASH/"), 1);
        assert_eq!(count(&content, "TRASH-FILES.md"), 1);
    }

    #[test]
    fn idempotent() {
        let (_tmp, repo) = test_repo::create();
        ensure_entries(&repo, "TRASH", "TRASH-FILES.md").unwrap();
        assert!(!ensure_entries(&repo, "TRASH", "TRASH-FILES.md").unwrap());
        let content = fs::read_to_string(repo.join(".gitignore")).unwrap();
        assert_eq!(count(&content, "TRASH/"), 1);
        assert_eq!(count(&content, "TRASH-FILES.md"), 1);
        assert_eq!(content.matches(HEADER).count(), 1);
    }

    #[test]
    fn nested_cwd_writes_repo_root() {
        let (_tmp, repo) = test_repo::create();
        let nested = repo.join("src/deep");
        fs::create_dir_all(&nested).unwrap();
        ensure_entries(&nested, "TRASH", "TRASH-FILES.md").unwrap();
        assert!(repo.join(".gitignore").exists());
        assert!(!nested.join(".gitignore").exists());
    }

    #[test]
    fn recognizes_entry_without_slash() {
        let (_tmp, repo) = test_repo::create();
        fs::write(repo.join(".gitignore"), "target\nTRASH").unwrap();
        assert!(ensure_entries(&repo, "TRASH", "TRASH-FILES.md").unwrap());
        let content = fs::read_to_string(repo.join(".gitignore")).unwrap();
        assert_eq!(count(&content, "TRASH/"), 0);
        assert_eq!(count(&content, "TRASH"), 1);
        assert_eq!(count(&content, "TRASH-FILES.md"), 1);
        // Missing final newline was repaired before appending
        assert!(content.starts_with("target\nTRASH\n"));
    }

    #[test]
    fn outside_repo_is_noop() {
        let tmp = tempfile::TempDir::new().unwrap();
        if find_repo_root(tmp.path()).is_none() {
            assert!(!ensure_entries(tmp.path(), "TRASH", "TRASH-FILES.md").unwrap());
            assert!(!tmp.path().join(".gitignore").exists());
        }
    }
}
