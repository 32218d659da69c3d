pub mod context;
pub mod decision;

pub use context::{CommandContext, GitInvocation};
pub use decision::{CheckResult, Decision, FinalDecision};

use std::path::Path;

use crate::checks::file_length::{FileLengthCheck, FileWrite};
use crate::checks::CommandCheck;
use crate::config::Settings;
use crate::parse;

/// Runs every checker over every segment and merges the verdicts.
///
/// Holds no mutable state; one instance may serve any number of
/// independent evaluations.
pub struct Evaluator {
    checks: Vec<Box<dyn CommandCheck>>,
    file_length: FileLengthCheck,
}

impl Evaluator {
    /// Build the checker set from a settings snapshot.
    pub fn from_config(settings: &Settings) -> Self {
        use crate::checks::{
            env_file::EnvFileCheck, git_add::GitAddCheck, git_checkout::GitCheckoutCheck,
            git_commit::GitCommitCheck, git_push_pull::GitPushPullCheck, rm::RmCheck,
        };

        let checks: Vec<Box<dyn CommandCheck>> = vec![
            Box::new(RmCheck::from_config(settings)),
            Box::new(EnvFileCheck::from_config(settings)),
            Box::new(GitAddCheck::from_config(settings)),
            Box::new(GitCheckoutCheck::from_config(settings)),
            Box::new(GitCommitCheck::from_config(settings)),
            Box::new(GitPushPullCheck::from_config(settings)),
        ];

        Self {
            checks,
            file_length: FileLengthCheck::from_config(settings),
        }
    }

    /// Classify one segment with every checker, in registration order.
    pub fn evaluate_segment(&self, segment: &str, cwd: &Path) -> Vec<(&'static str, CheckResult)> {
        let ctx = CommandContext::new(segment, cwd);
        self.checks
            .iter()
            .filter(|c| c.enabled())
            .map(|c| (c.name(), c.check(&ctx)))
            .collect()
    }

    /// Evaluate a full command line, compound or not.
    pub fn evaluate(&self, command: &str, cwd: &Path) -> FinalDecision {
        let pipeline = parse::parse(command);
        if pipeline.segments.is_empty() && pipeline.substitutions.is_empty() {
            return FinalDecision::allow("empty command");
        }

        if pipeline.is_compound() {
            log::debug!(
                "compound command: {} segment(s), {} substitution segment(s), operators [{}]",
                pipeline.segments.len(),
                pipeline.substitutions.len(),
                pipeline.operator_summary()
            );
        }

        let mut results = Vec::new();
        for segment in pipeline.all_segments() {
            for (name, result) in self.evaluate_segment(segment, cwd) {
                let label: String = segment.chars().take(60).collect();
                log::debug!("[{label}] {name} -> {}", result.decision.label());
                results.push((name, result));
            }
        }

        combine(results)
    }

    /// Evaluate a proposed file write. `None` means no opinion.
    pub fn evaluate_file_write(&self, write: &FileWrite, cwd: &Path) -> Option<CheckResult> {
        let result = self.file_length.check(write, cwd);
        if let Some(ref r) = result {
            log::debug!(
                "{} on {} -> {}",
                self.file_length.name(),
                write.file_path(),
                r.decision.label()
            );
        }
        result
    }
}

/// Fold per-checker results into one decision: the highest severity wins,
/// and every distinct reason at that severity is kept in first-seen order.
pub fn combine<I>(results: I) -> FinalDecision
where
    I: IntoIterator<Item = (&'static str, CheckResult)>,
{
    let results: Vec<(&'static str, CheckResult)> = results.into_iter().collect();
    let worst = results
        .iter()
        .map(|(_, r)| r.decision)
        .max()
        .unwrap_or(Decision::Allow);

    if worst == Decision::Allow {
        return FinalDecision::allow("no safety checks triggered");
    }

    let mut reasons: Vec<&str> = Vec::new();
    let mut triggered: Vec<&'static str> = Vec::new();
    for (name, result) in results.iter().filter(|(_, r)| r.decision == worst) {
        if !triggered.contains(name) {
            triggered.push(*name);
        }
        if !result.reason.is_empty() && !reasons.contains(&result.reason.as_str()) {
            reasons.push(&result.reason);
        }
    }

    FinalDecision {
        decision: worst,
        reason: reasons.join("\n"),
        triggered,
    }
}
