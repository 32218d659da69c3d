use crate::checks::CommandCheck;
use crate::config::Settings;
use crate::eval::{CheckResult, CommandContext};

/// Remote-affecting `git push` and `git pull` always ask.
pub struct GitPushPullCheck {
    enabled: bool,
}

impl GitPushPullCheck {
    pub fn from_config(settings: &Settings) -> Self {
        Self {
            enabled: settings.enabled.git_push_pull_ask,
        }
    }
}

impl CommandCheck for GitPushPullCheck {
    fn name(&self) -> &'static str {
        "git_push_pull_ask"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn classify(&self, ctx: &CommandContext) -> CheckResult {
        match ctx.git().map(|g| g.subcommand) {
            Some("push") => CheckResult::ask("Git push requires your approval."),
            Some("pull") => CheckResult::ask("Git pull requires your approval."),
            _ => CheckResult::allow(),
        }
    }
}
