use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Global override, relative to the home directory.
const GLOBAL_CONFIG: &str = "~/.claude/plugins/safety-hooks.toml";

/// Project override, relative to the working directory.
const PROJECT_CONFIG: &str = ".claude/plugins/safety-hooks.toml";

// ── Final (merged) settings snapshot ──

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub enabled: EnabledChecks,
    #[serde(default)]
    pub rm_block: RmBlockConfig,
    #[serde(default)]
    pub env_protection: EnvProtectionConfig,
    #[serde(default)]
    pub git_add_block: GitAddConfig,
    #[serde(default)]
    pub git_checkout: GitCheckoutConfig,
    #[serde(default)]
    pub file_length_limit: FileLengthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Per-checker on/off switches.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EnabledChecks {
    #[serde(default)]
    pub rm_block: bool,
    #[serde(default)]
    pub env_protection: bool,
    #[serde(default)]
    pub git_add_block: bool,
    #[serde(default)]
    pub git_checkout_block: bool,
    #[serde(default)]
    pub git_commit_ask: bool,
    #[serde(default)]
    pub git_push_pull_ask: bool,
    #[serde(default)]
    pub file_length_limit: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct RmBlockConfig {
    #[serde(default)]
    pub trash_dir: String,
    /// Ask the agent to record each trashed file in `log_file`.
    #[serde(default)]
    pub require_log: bool,
    #[serde(default)]
    pub log_file: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EnvProtectionConfig {
    /// Regexes; a match against the referenced path exempts it.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GitAddConfig {
    #[serde(default)]
    pub allow_wildcards: bool,
    #[serde(default)]
    pub allow_dot_add: bool,
    #[serde(default)]
    pub allow_all_flag: bool,
    /// Ask before staging tracked files that have unstaged modifications.
    #[serde(default)]
    pub ask_modified_files: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GitCheckoutConfig {
    #[serde(default)]
    pub force_protection: bool,
    #[serde(default)]
    pub dot_protection: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct FileLengthConfig {
    #[serde(default)]
    pub max_lines: usize,
    /// Extensions with leading dot, or `"auto"` for the built-in list.
    #[serde(default)]
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct LoggingConfig {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    #[serde(default)]
    pub level: String,
    /// Log file path; `~` is expanded. Empty disables file logging.
    #[serde(default)]
    pub file: String,
}

// ── Overlay types (override files merged onto defaults) ──

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    #[serde(default)]
    enabled: EnabledOverlay,
    #[serde(default)]
    rm_block: RmBlockOverlay,
    #[serde(default)]
    env_protection: EnvProtectionOverlay,
    #[serde(default)]
    git_add_block: GitAddOverlay,
    #[serde(default)]
    git_checkout: GitCheckoutOverlay,
    #[serde(default)]
    file_length_limit: FileLengthOverlay,
    #[serde(default)]
    logging: LoggingOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct EnabledOverlay {
    rm_block: Option<bool>,
    env_protection: Option<bool>,
    git_add_block: Option<bool>,
    git_checkout_block: Option<bool>,
    git_commit_ask: Option<bool>,
    git_push_pull_ask: Option<bool>,
    file_length_limit: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct RmBlockOverlay {
    trash_dir: Option<String>,
    require_log: Option<bool>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct EnvProtectionOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    ignore_patterns: Vec<String>,
    #[serde(default)]
    remove_ignore_patterns: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct GitAddOverlay {
    allow_wildcards: Option<bool>,
    allow_dot_add: Option<bool>,
    allow_all_flag: Option<bool>,
    ask_modified_files: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct GitCheckoutOverlay {
    force_protection: Option<bool>,
    dot_protection: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct FileLengthOverlay {
    max_lines: Option<usize>,
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    extensions: Vec<String>,
    #[serde(default)]
    remove_extensions: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingOverlay {
    level: Option<String>,
    file: Option<String>,
}

// ── Merge logic ──

/// Merge a user list into a default list.
/// In replace mode: user list replaces default entirely.
/// In merge mode: remove items first, then extend with additions (deduped).
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *target = v;
    }
}

impl Settings {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Resolve the settings snapshot for a working directory:
    /// 1. Start with embedded defaults
    /// 2. Merge `~/.claude/plugins/safety-hooks.toml` (if present)
    /// 3. Merge `<cwd>/.claude/plugins/safety-hooks.toml` (if present)
    ///
    /// A layer that cannot be read or parsed is skipped and handed back
    /// with the snapshot; the caller decides where to report it (the
    /// binary resolves settings before its logger exists).
    pub fn load(cwd: &Path) -> (Self, Vec<ConfigError>) {
        let global = PathBuf::from(shellexpand::tilde(GLOBAL_CONFIG).as_ref());
        let project = cwd.join(PROJECT_CONFIG);
        Self::load_layers(&[global, project])
    }

    /// Merge the given override files, in order, onto the defaults.
    pub fn load_layers(paths: &[PathBuf]) -> (Self, Vec<ConfigError>) {
        let mut settings = Self::default_config();
        let mut skipped = Vec::new();
        for path in paths {
            match Self::read_overlay(path) {
                Ok(Some(overlay)) => settings.apply_overlay(overlay),
                Ok(None) => {}
                Err(e) => skipped.push(e),
            }
        }
        (settings, skipped)
    }

    /// Read one override file. A missing file is not an error.
    fn read_overlay(path: &Path) -> Result<Option<SettingsOverlay>, ConfigError> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let overlay = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(overlay))
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: SettingsOverlay) {
        let e = overlay.enabled;
        set(&mut self.enabled.rm_block, e.rm_block);
        set(&mut self.enabled.env_protection, e.env_protection);
        set(&mut self.enabled.git_add_block, e.git_add_block);
        set(&mut self.enabled.git_checkout_block, e.git_checkout_block);
        set(&mut self.enabled.git_commit_ask, e.git_commit_ask);
        set(&mut self.enabled.git_push_pull_ask, e.git_push_pull_ask);
        set(&mut self.enabled.file_length_limit, e.file_length_limit);

        let rm = overlay.rm_block;
        set(&mut self.rm_block.trash_dir, rm.trash_dir);
        set(&mut self.rm_block.require_log, rm.require_log);
        set(&mut self.rm_block.log_file, rm.log_file);

        let env = overlay.env_protection;
        merge_list(
            &mut self.env_protection.ignore_patterns,
            env.ignore_patterns,
            &env.remove_ignore_patterns,
            env.replace,
        );

        let ga = overlay.git_add_block;
        set(&mut self.git_add_block.allow_wildcards, ga.allow_wildcards);
        set(&mut self.git_add_block.allow_dot_add, ga.allow_dot_add);
        set(&mut self.git_add_block.allow_all_flag, ga.allow_all_flag);
        set(&mut self.git_add_block.ask_modified_files, ga.ask_modified_files);

        let gc = overlay.git_checkout;
        set(&mut self.git_checkout.force_protection, gc.force_protection);
        set(&mut self.git_checkout.dot_protection, gc.dot_protection);

        let fl = overlay.file_length_limit;
        set(&mut self.file_length_limit.max_lines, fl.max_lines);
        merge_list(
            &mut self.file_length_limit.extensions,
            fl.extensions,
            &fl.remove_extensions,
            fl.replace,
        );

        let lg = overlay.logging;
        set(&mut self.logging.level, lg.level);
        set(&mut self.logging.file, lg.file);
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    pub(crate) fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: SettingsOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
