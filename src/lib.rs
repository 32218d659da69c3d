//! safety-hooks: a PreToolUse hook for Claude Code that stops destructive
//! shell commands and oversized file writes before they run.
//!
//! A Bash command is split into segments (operators, here-docs and command
//! substitutions included), every enabled checker classifies every segment,
//! and the verdicts fold into one [`eval::Decision`]: `Block` beats `Ask`
//! beats `Allow`. Write/Edit calls go through the file-length gate instead.
//!
//! # Architecture
//!
//! - **[`parse`]**: Command splitting, substitution extraction, shlex tokenizer.
//! - **[`eval`]**: Decision types, per-segment context, the combining evaluator.
//! - **[`checks`]**: One rule checker per file (rm, `.env`, git add/checkout/commit/push).
//! - **[`config`]**: Embedded defaults plus global and project overlays.
//! - **[`hook`]**: Host event decoding and response shapes.
//! - **[`logging`]**: Decision log via `simplelog`.

/// Rule checkers and the shared checker trait.
pub mod checks;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error types for config, git and hook input.
pub mod error;
/// Evaluation engine: decisions, command context, combiner.
pub mod eval;
/// Thin wrapper over the `git` CLI.
pub mod git;
/// Host event decoding and response rendering.
pub mod hook;
/// Keeps the trash directory and its log out of version control.
pub mod ignore_file;
/// Logger setup and decision records.
pub mod logging;
/// Shell command parsing: splitter, substitutions, tokenizer.
pub mod parse;

use std::path::Path;

use checks::file_length::FileWrite;
use eval::{CheckResult, Evaluator, FinalDecision};

/// Evaluate a command string with the default settings.
///
/// This is the main entry point for tests and simple usage.
/// The binary builds an [`Evaluator`] from layered settings instead.
pub fn evaluate(command: &str, cwd: &Path) -> FinalDecision {
    let settings = config::Settings::default_config();
    Evaluator::from_config(&settings).evaluate(command, cwd)
}

/// Evaluate a proposed file write with the default settings.
/// `None` means the hook has no opinion.
pub fn evaluate_file_write(write: &FileWrite, cwd: &Path) -> Option<CheckResult> {
    let settings = config::Settings::default_config();
    Evaluator::from_config(&settings).evaluate_file_write(write, cwd)
}
