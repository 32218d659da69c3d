use crate::checks::CommandCheck;
use crate::config::Settings;
use crate::eval::{CheckResult, CommandContext};

/// Every `git commit`, whatever its flags, needs a human's approval.
pub struct GitCommitCheck {
    enabled: bool,
}

impl GitCommitCheck {
    pub fn from_config(settings: &Settings) -> Self {
        Self {
            enabled: settings.enabled.git_commit_ask,
        }
    }
}

impl CommandCheck for GitCommitCheck {
    fn name(&self) -> &'static str {
        "git_commit_ask"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn classify(&self, ctx: &CommandContext) -> CheckResult {
        if ctx.is_git("commit") {
            CheckResult::ask("Git commit requires your approval.")
        } else {
            CheckResult::allow()
        }
    }
}
