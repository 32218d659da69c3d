use crate::checks::CommandCheck;
use crate::config::Settings;
use crate::eval::{CheckResult, CommandContext};
use crate::git;

/// Status lines listed in the dirty-tree reason before truncating.
const LIST_LIMIT: usize = 10;

const SAFER: &str = "Safer alternatives:\n\
    - 'git stash' to save changes temporarily\n\
    - 'git diff' to see what would be lost\n\
    - 'git switch <branch>' to change branches, 'git restore <file>' for single files";

/// Blocks `git checkout` forms that discard uncommitted work.
pub struct GitCheckoutCheck {
    enabled: bool,
    force_protection: bool,
    dot_protection: bool,
}

impl GitCheckoutCheck {
    pub fn from_config(settings: &Settings) -> Self {
        Self {
            enabled: settings.enabled.git_checkout_block,
            force_protection: settings.git_checkout.force_protection,
            dot_protection: settings.git_checkout.dot_protection,
        }
    }

    /// Headline, then up to [`LIST_LIMIT`] affected entries, then the alternatives.
    fn lost_changes_reason(headline: &str, entries: &[git::StatusEntry]) -> String {
        let mut reason = format!(
            "{headline}: {} uncommitted change(s) would be lost.\n\n",
            entries.len()
        );
        for entry in entries.iter().take(LIST_LIMIT) {
            reason.push_str(&format!("  {entry}\n"));
        }
        if entries.len() > LIST_LIMIT {
            reason.push_str(&format!("  ... and {} more\n", entries.len() - LIST_LIMIT));
        }
        reason.push('\n');
        reason.push_str(SAFER);
        reason
    }
}

impl CommandCheck for GitCheckoutCheck {
    fn name(&self) -> &'static str {
        "git_checkout_block"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn classify(&self, ctx: &CommandContext) -> CheckResult {
        let Some(git) = ctx.git().filter(|g| g.subcommand == "checkout") else {
            return CheckResult::allow();
        };

        // Branch creation and help never touch the working tree
        if git.has_any_flag(&["-b", "-B", "--orphan", "-h", "--help"]) {
            return CheckResult::allow();
        }

        if self.force_protection && git.has_any_flag(&["-f", "--force"]) {
            return CheckResult::block(format!(
                "'git checkout -f' FORCES the checkout and DISCARDS all uncommitted changes.\n\
                 This destroys uncommitted work without warning.\n\n{SAFER}"
            ));
        }

        if !self.dot_protection {
            return CheckResult::allow();
        }

        if git.pathspecs().iter().any(|p| *p == "." || *p == "./") {
            match git::status_porcelain(&git.work_dir, &[]) {
                Ok(entries) if !entries.is_empty() => {
                    return CheckResult::block(Self::lost_changes_reason(
                        "'git checkout .' will DISCARD ALL local changes",
                        &entries,
                    ));
                }
                Ok(_) => {}
                Err(e) => log::debug!("git checkout: status unavailable: {e}"),
            }
            return CheckResult::allow();
        }

        // `git checkout <ref> -- <path>...` overwrites those files in place
        let paths = git.after_double_dash();
        if !paths.is_empty() {
            match git::status_porcelain(&git.work_dir, &paths) {
                Ok(entries) if !entries.is_empty() => {
                    return CheckResult::block(Self::lost_changes_reason(
                        "'git checkout <ref> -- <path>' will OVERWRITE local files \
                         with the version from another branch or commit",
                        &entries,
                    ));
                }
                Ok(_) => {}
                Err(e) => log::debug!("git checkout: status unavailable: {e}"),
            }
        }

        CheckResult::allow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Decision;
    use crate::git::test_repo;
    use std::fs;
    use std::path::Path;

    fn eval_in(settings: &Settings, cmd: &str, cwd: &Path) -> Decision {
        GitCheckoutCheck::from_config(settings)
            .check(&CommandContext::new(cmd, cwd))
            .decision
    }

    fn eval(cmd: &str) -> Decision {
        let tmp = tempfile::TempDir::new().unwrap();
        eval_in(&Settings::default_config(), cmd, tmp.path())
    }

    #[test]
    fn block_force() {
        assert_eq!(eval("git checkout -f"), Decision::Block);
        assert_eq!(eval("git checkout --force main"), Decision::Block);
    }

    #[test]
    fn allow_safe_forms() {
        assert_eq!(eval("git checkout -b newbranch"), Decision::Allow);
        assert_eq!(eval("git checkout --help"), Decision::Allow);
        assert_eq!(eval("git checkout main"), Decision::Allow);
        assert_eq!(eval("git status"), Decision::Allow);
    }

    #[test]
    fn dot_blocks_only_with_changes() {
        let (_tmp, repo) = test_repo::create();
        let settings = Settings::default_config();
        assert_eq!(eval_in(&settings, "git checkout .", &repo), Decision::Allow);

        fs::write(repo.join("README.md"), "local edits\n").unwrap();
        assert_eq!(eval_in(&settings, "git checkout .", &repo), Decision::Block);
        assert_eq!(eval_in(&settings, "git checkout -- .", &repo), Decision::Block);
        assert_eq!(eval_in(&settings, "git checkout main", &repo), Decision::Allow);
    }

    #[test]
    fn dot_reason_lists_changes() {
        let (_tmp, repo) = test_repo::create();
        fs::write(repo.join("README.md"), "local edits\n").unwrap();
        let r = GitCheckoutCheck::from_config(&Settings::default_config())
            .check(&CommandContext::new("git checkout .", &repo));
        assert!(r.reason.contains("README.md"), "{}", r.reason);
        assert!(r.reason.contains("git stash"));
    }

    #[test]
    fn restoring_modified_paths_from_a_ref_blocks() {
        let (_tmp, repo) = test_repo::create();
        test_repo::commit(&repo, "src/lib.rs", "fn a() {}\n", "lib");
        let settings = Settings::default_config();
        assert_eq!(eval_in(&settings, "git checkout HEAD -- src/lib.rs", &repo), Decision::Allow);

        fs::write(repo.join("src/lib.rs"), "fn b() {}\n").unwrap();
        let r = GitCheckoutCheck::from_config(&settings)
            .check(&CommandContext::new("git checkout HEAD -- src/lib.rs", &repo));
        assert_eq!(r.decision, Decision::Block);
        assert!(r.reason.contains("src/lib.rs"), "{}", r.reason);
        assert!(r.reason.contains("OVERWRITE"));

        // Changes elsewhere do not matter
        assert_eq!(eval_in(&settings, "git checkout HEAD -- README.md", &repo), Decision::Allow);
    }

    #[test]
    fn dash_c_checks_the_named_repository() {
        let (_tmp, repo) = test_repo::create();
        fs::write(repo.join("README.md"), "local edits\n").unwrap();
        let (_clean_tmp, clean) = test_repo::create();

        let cmd = format!("git -C {} checkout .", repo.display());
        assert_eq!(eval_in(&Settings::default_config(), &cmd, &clean), Decision::Block);
    }

    #[test]
    fn dot_outside_repo_allows() {
        assert_eq!(eval("git checkout ."), Decision::Allow);
    }

    #[test]
    fn protections_can_be_disabled() {
        let mut settings = Settings::default_config();
        settings.git_checkout.force_protection = false;
        let tmp = tempfile::TempDir::new().unwrap();
        assert_eq!(eval_in(&settings, "git checkout -f", tmp.path()), Decision::Allow);

        let (_repo_tmp, repo) = test_repo::create();
        fs::write(repo.join("README.md"), "local edits\n").unwrap();
        settings.git_checkout.dot_protection = false;
        assert_eq!(eval_in(&settings, "git checkout .", &repo), Decision::Allow);
    }
}
