use std::sync::LazyLock;

use regex::Regex;

use crate::checks::CommandCheck;
use crate::config::Settings;
use crate::eval::{CheckResult, CommandContext};

/// `.env`, `.env.local`, `.env.production`, `.env*` (case-insensitive).
static ENV_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\.env(\.[\w.*-]+|\*)?$").expect("valid regex"));

const REASON: &str = "Blocked: direct access to .env files is not allowed for security reasons.\n\n\
    - Reading .env files could expose secret values\n\
    - Writing or editing .env files should be done by a human, outside the agent\n\n\
    To inspect safely, list only the keys (e.g. `env-safe list`, `env-safe check KEY_NAME`) \
    without printing values.";

/// Blocks any command that names a `.env` file as an argument, whatever
/// the verb: readers, editors, search tools and redirections alike.
pub struct EnvFileCheck {
    enabled: bool,
    ignore: Vec<Regex>,
}

impl EnvFileCheck {
    pub fn from_config(settings: &Settings) -> Self {
        let ignore = settings
            .env_protection
            .ignore_patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    log::warn!("skipping invalid env ignore pattern {p:?}: {e}");
                    None
                }
            })
            .collect();
        Self {
            enabled: settings.enabled.env_protection,
            ignore,
        }
    }

    fn is_ignored(&self, path: &str) -> bool {
        self.ignore.iter().any(|re| re.is_match(path))
    }

    /// First `.env` path referenced by the segment that is not ignored.
    fn find_env_path<'w>(&self, words: &'w [String]) -> Option<&'w str> {
        words
            .iter()
            .flat_map(|w| candidates(w))
            .find(|path| is_env_file(path) && !self.is_ignored(path))
    }
}

/// Drop a leading redirection operator glued to its target: `>.env`, `2>>.env`, `&>.env`.
fn strip_redirection(word: &str) -> &str {
    let prefix_len = word
        .find(|c: char| !matches!(c, '<' | '>' | '&' | '|' | '0'..='9'))
        .unwrap_or(word.len());
    let prefix = &word[..prefix_len];
    if prefix.contains('<') || prefix.contains('>') {
        &word[prefix_len..]
    } else {
        word
    }
}

/// Path-like pieces of one word: the word itself and any `--opt=value` value.
fn candidates(word: &str) -> impl Iterator<Item = &str> {
    let word = strip_redirection(word).trim_matches(|c| c == '"' || c == '\'');
    let value = word.rsplit_once('=').map(|(_, v)| v);
    std::iter::once(word).chain(value)
}

fn is_env_file(path: &str) -> bool {
    let name = path.rsplit('/').next().unwrap_or(path);
    ENV_FILE.is_match(name)
}

impl CommandCheck for EnvFileCheck {
    fn name(&self) -> &'static str {
        "env_protection"
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn classify(&self, ctx: &CommandContext) -> CheckResult {
        match self.find_env_path(&ctx.words) {
            Some(path) => {
                log::debug!("env file referenced: {path}");
                CheckResult::block(REASON)
            }
            None => CheckResult::allow(),
        }
    }
}
