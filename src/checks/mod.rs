//! Rule checkers: one file per concern.
//!
//! Every command checker sees one segment at a time and answers
//! allow/ask/block. A checker that does not recognize the command shape
//! allows it; a checker that hits an internal error allows it too.

/// Secret-file protection for `.env` and `.env.<suffix>`.
pub mod env_file;
/// Line-count gate for proposed file writes.
pub mod file_length;
/// `git add` wildcard / dot / `-A` protection.
pub mod git_add;
/// `git checkout` force and discard protection.
pub mod git_checkout;
/// `git commit` approval gate.
pub mod git_commit;
/// `git push` / `git pull` approval gate.
pub mod git_push_pull;
/// `rm` replacement with a trash directory.
pub mod rm;

use crate::eval::{CheckResult, CommandContext};

/// Trait for command-segment checkers.
pub trait CommandCheck: Send + Sync {
    /// Stable name, as used in the `[enabled]` config section.
    fn name(&self) -> &'static str;

    fn enabled(&self) -> bool;

    /// Classify one segment, ignoring the enabled flag.
    fn classify(&self, ctx: &CommandContext) -> CheckResult;

    /// Classify one segment; disabled checkers always allow.
    fn check(&self, ctx: &CommandContext) -> CheckResult {
        if !self.enabled() {
            return CheckResult::allow();
        }
        self.classify(ctx)
    }
}
