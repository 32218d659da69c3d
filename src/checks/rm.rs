use crate::checks::CommandCheck;
use crate::config::{RmBlockConfig, Settings};
use crate::eval::{CheckResult, CommandContext};
use crate::ignore_file;

/// Blocks `rm` in any spelling (`rm`, `/bin/rm`, `\rm`) and points the
/// agent at a trash directory instead.
pub struct RmCheck {
    enabled: bool,
    trash_dir: String,
    require_log: bool,
    log_file: String,
}

impl RmCheck {
    pub fn from_config(settings: &Settings) -> Self {
        let RmBlockConfig {
            trash_dir,
            require_log,
            log_file,
        } = settings.rm_block.clone();
        Self {
            enabled: settings.enabled.rm_block,
            trash_dir,
            require_log,
            log_file,
        }
    }

    fn reason(&self) -> String {
        let trash = &self.trash_dir;
        let mut reason = format!(
            "Instead of using 'rm':\n\
             - MOVE files using `mv` to the {trash} directory in the CURRENT folder (create it if needed)"
        );
        if self.require_log {
            let log = &self.log_file;
            reason.push_str(&format!(
                ",\n\
                 - Add an entry in a markdown file called '{log}' in the current directory, \
                 with a one-liner per file: the file name, where it moved, and why it was trashed, e.g.:\n\n\
                 ```\n\
                 test_script.py - moved to {trash}/ - temporary test script\n\
                 data/junk.txt - moved to {trash}/ - data file we don't need\n\
                 ```"
            ));
        }
        reason
    }
}

impl CommandCheck for RmCheck {
    fn name(&self) -> &'static str {
        "rm_block"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn classify(&self, ctx: &CommandContext) -> CheckResult {
        if ctx.base_command != "rm" {
            return CheckResult::allow();
        }

        if let Err(e) = ignore_file::ensure_entries(ctx.cwd, &self.trash_dir, &self.log_file) {
            log::warn!("could not update .gitignore: {e}");
        }

        CheckResult::block(self.reason())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Decision;
    use crate::git::test_repo;
    use std::path::Path;

    fn check() -> RmCheck {
        RmCheck::from_config(&Settings::default_config())
    }

    fn eval_in(cmd: &str, cwd: &Path) -> CheckResult {
        check().check(&CommandContext::new(cmd, cwd))
    }

    fn eval(cmd: &str) -> Decision {
        // A fresh directory outside any repository keeps the side effect contained
        let tmp = tempfile::TempDir::new().unwrap();
        eval_in(cmd, tmp.path()).decision
    }

    #[test]
    fn block_rm_variants() {
        assert_eq!(eval("rm file.txt"), Decision::Block);
        assert_eq!(eval("/bin/rm file.txt"), Decision::Block);
        assert_eq!(eval("rm -rf dir/"), Decision::Block);
        assert_eq!(eval("rm"), Decision::Block);
        assert_eq!(eval("FOO=1 /usr/bin/rm x"), Decision::Block);
    }

    #[test]
    fn allow_non_rm() {
        assert_eq!(eval("trash file.txt"), Decision::Allow);
        assert_eq!(eval("grep pattern file"), Decision::Allow);
        assert_eq!(eval("rmdir empty"), Decision::Allow);
        assert_eq!(eval("echo rm file"), Decision::Allow);
        assert_eq!(eval("git rm --cached x"), Decision::Allow);
    }

    #[test]
    fn reason_mentions_trash_and_log() {
        let tmp = tempfile::TempDir::new().unwrap();
        let r = eval_in("rm a", tmp.path());
        assert!(r.reason.contains("TRASH directory"));
        assert!(r.reason.contains("TRASH-FILES.md"));
    }

    #[test]
    fn reason_without_log() {
        let mut settings = Settings::default_config();
        settings.rm_block.require_log = false;
        let tmp = tempfile::TempDir::new().unwrap();
        let r = RmCheck::from_config(&settings).check(&CommandContext::new("rm a", tmp.path()));
        assert_eq!(r.decision, Decision::Block);
        assert!(!r.reason.contains("TRASH-FILES.md"));
    }

    #[test]
    fn disabled_allows() {
        let mut settings = Settings::default_config();
        settings.enabled.rm_block = false;
        let tmp = tempfile::TempDir::new().unwrap();
        let r = RmCheck::from_config(&settings).check(&CommandContext::new("rm a", tmp.path()));
        assert!(r.is_allow());
    }

    #[test]
    fn amends_gitignore_once() {
        let (_tmp, repo) = test_repo::create();
        let nested = repo.join("sub");
        std::fs::create_dir_all(&nested).unwrap();

        eval_in("rm a.txt", &repo);
        eval_in("rm -rf b/", &nested);

        let content = std::fs::read_to_string(repo.join(".gitignore")).unwrap();
        assert_eq!(content.lines().filter(|l| *l == "TRASH/").count(), 1);
        assert_eq!(content.lines().filter(|l| *l == "TRASH-FILES.md").count(), 1);
        assert!(!nested.join(".gitignore").exists());
    }

    #[test]
    fn non_rm_does_not_touch_gitignore() {
        let (_tmp, repo) = test_repo::create();
        eval_in("ls -la", &repo);
        assert!(!repo.join(".gitignore").exists());
    }
}
