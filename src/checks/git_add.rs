use std::path::Path;

use crate::checks::CommandCheck;
use crate::config::{GitAddConfig, Settings};
use crate::eval::{CheckResult, CommandContext, GitInvocation};
use crate::git;

/// Files listed in an ask reason before truncating.
const LIST_LIMIT: usize = 5;

const REASON_WILDCARD: &str = "BLOCKED: wildcard patterns are not allowed in git add.\n\
    Do not use 'git add *.py' or 'git add *'. Instead:\n\
    - 'git add <file>' to stage specific files\n\
    - 'git ls-files -m \"*.py\" | xargs git add' if you really need pattern matching\n\n\
    This prevents accidentally staging unwanted files.";

const REASON_BULK: &str = "BLOCKED: dangerous git add pattern detected.\n\
    Do not use:\n\
    - 'git add -A' or 'git add --all' (stages ALL files)\n\
    - 'git add .' (stages the entire current directory)\n\
    - 'git add ../' or other parent directory paths\n\n\
    Instead:\n\
    - 'git add <file>' to stage specific files\n\
    - 'git add <dir>/' to stage a specific directory (with confirmation)\n\
    - 'git add -u' to stage modified and deleted files, but not untracked ones\n\n\
    This prevents accidentally staging unwanted files.";

/// Guards `git add` against bulk staging.
///
/// Order: `--dry-run` → allow; `-A`/`--all`, wildcards, `.`/`..` → block;
/// directories or files with unstaged modifications → ask.
pub struct GitAddCheck {
    enabled: bool,
    config: GitAddConfig,
}

impl GitAddCheck {
    pub fn from_config(settings: &Settings) -> Self {
        Self {
            enabled: settings.enabled.git_add_block,
            config: settings.git_add_block.clone(),
        }
    }

    fn stages_everything(git: &GitInvocation) -> bool {
        git.args.iter().any(|a| {
            a == "--all" || (a.starts_with('-') && !a.starts_with("--") && a.contains('A'))
        })
    }

    /// Ask when a directory pathspec would sweep up tracked modifications.
    fn check_directories(work_dir: &Path, dirs: &[&str]) -> Option<CheckResult> {
        for &dir in dirs {
            match git::modified_entries(work_dir, &[dir]) {
                Ok(entries) if !entries.is_empty() => {
                    let files: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
                    return Some(CheckResult::ask(format!(
                        "Staging directory {}/ with modified files: {}",
                        dir.trim_end_matches('/'),
                        git::summarize(&files, LIST_LIMIT)
                    )));
                }
                Ok(_) => {}
                Err(e) => log::debug!("git add: status for {dir} unavailable: {e}"),
            }
        }
        None
    }

    fn check_files(work_dir: &Path, files: &[&str]) -> Option<CheckResult> {
        if files.is_empty() {
            return None;
        }
        match git::modified_entries(work_dir, files) {
            Ok(entries) if !entries.is_empty() => {
                let names: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
                Some(CheckResult::ask(format!(
                    "Staging modified files: {}",
                    git::summarize(&names, LIST_LIMIT)
                )))
            }
            Ok(_) => None,
            Err(e) => {
                log::debug!("git add: status unavailable: {e}");
                None
            }
        }
    }
}

fn has_wildcard(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// `.`, `./`, `..`, `../..` and the like: paths that name no specific file.
fn is_bulk_path(path: &str) -> bool {
    if path == ":/" || path == ":" {
        return true;
    }
    let trimmed = path.trim_end_matches('/');
    !trimmed.is_empty() && trimmed.split('/').all(|c| c == "." || c == "..")
}

impl CommandCheck for GitAddCheck {
    fn name(&self) -> &'static str {
        "git_add_block"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn classify(&self, ctx: &CommandContext) -> CheckResult {
        let Some(git) = ctx.git().filter(|g| g.subcommand == "add") else {
            return CheckResult::allow();
        };

        if git.has_any_flag(&["--dry-run", "-n"]) {
            return CheckResult::allow();
        }

        let pathspecs = git.pathspecs();

        if !self.config.allow_all_flag && Self::stages_everything(&git) {
            return CheckResult::block(REASON_BULK);
        }
        if !self.config.allow_wildcards && pathspecs.iter().any(|p| has_wildcard(p)) {
            return CheckResult::block(REASON_WILDCARD);
        }
        if !self.config.allow_dot_add && pathspecs.iter().any(|p| is_bulk_path(p)) {
            return CheckResult::block(REASON_BULK);
        }

        let (dirs, files): (Vec<&str>, Vec<&str>) = pathspecs
            .into_iter()
            .partition(|p| p.ends_with('/') || git.work_dir.join(p).is_dir());

        if let Some(result) = Self::check_directories(&git.work_dir, &dirs) {
            return result;
        }
        if self.config.ask_modified_files
            && let Some(result) = Self::check_files(&git.work_dir, &files)
        {
            return result;
        }

        CheckResult::allow()
    }
}
