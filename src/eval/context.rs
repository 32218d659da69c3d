use std::path::{Path, PathBuf};

/// Git global options that consume the following word.
const GIT_OPTS_WITH_VALUE: &[&str] = &[
    "-C",
    "-c",
    "--git-dir",
    "--work-tree",
    "--namespace",
    "--config-env",
    "--super-prefix",
];

/// Context for evaluating a single command segment.
#[derive(Debug)]
pub struct CommandContext<'a> {
    /// The base command name (e.g. "git", "rm", "cat").
    pub base_command: String,
    /// All words of the command line (tokenized via shlex); here-document
    /// bodies are not included.
    pub words: Vec<String>,
    /// Leading KEY=VALUE environment variable assignments.
    pub env_vars: Vec<(String, String)>,
    /// Directory the command will run in.
    pub cwd: &'a Path,
}

/// A `git <subcommand> <args...>` invocation with global options removed.
#[derive(Debug, Clone)]
pub struct GitInvocation<'c> {
    pub subcommand: &'c str,
    pub args: &'c [String],
    /// Directory git will operate in: the segment's cwd with every
    /// `-C <dir>` applied in order.
    pub work_dir: PathBuf,
}

impl GitInvocation<'_> {
    pub fn has_any_flag(&self, flags: &[&str]) -> bool {
        self.args.iter().any(|a| flags.contains(&a.as_str()))
    }

    /// Arguments after a literal `--`; empty when there is none.
    pub fn after_double_dash(&self) -> Vec<&str> {
        self.args
            .iter()
            .skip_while(|a| *a != "--")
            .skip(1)
            .map(String::as_str)
            .collect()
    }

    /// Non-flag arguments. Everything after `--` counts as a pathspec.
    pub fn pathspecs(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut after_dashdash = false;
        for arg in self.args {
            if after_dashdash {
                out.push(arg.as_str());
            } else if arg == "--" {
                after_dashdash = true;
            } else if !arg.starts_with('-') {
                out.push(arg.as_str());
            }
        }
        out
    }
}

impl<'a> CommandContext<'a> {
    /// Build a CommandContext from a raw segment and its working directory.
    pub fn new(raw: &str, cwd: &'a Path) -> Self {
        let words = crate::parse::tokenize(&crate::parse::strip_heredoc_bodies(raw));
        let env_vars = crate::parse::env_vars(&words);
        let base_command = crate::parse::base_command(&words);

        Self {
            base_command,
            words,
            env_vars,
            cwd,
        }
    }

    /// Get words after skipping env vars and the base command.
    pub fn args(&self) -> &[String] {
        let skip = self.env_vars.len() + 1;
        if self.words.len() > skip {
            &self.words[skip..]
        } else {
            &[]
        }
    }

    /// Split a git command into its subcommand and arguments.
    ///
    /// Returns `None` when the segment is not a git command or has no
    /// subcommand. Global options such as `-C <dir>` are skipped.
    pub fn git(&self) -> Option<GitInvocation<'_>> {
        if self.base_command != "git" {
            return None;
        }
        let args = self.args();
        let mut work_dir = self.cwd.to_path_buf();
        let mut i = 0;
        while i < args.len() {
            let word = args[i].as_str();
            if word == "-C" {
                if let Some(dir) = args.get(i + 1) {
                    work_dir = work_dir.join(dir);
                }
                i += 2;
            } else if GIT_OPTS_WITH_VALUE.contains(&word) {
                i += 2;
            } else if word.starts_with('-') {
                i += 1;
            } else {
                return Some(GitInvocation {
                    subcommand: word,
                    args: &args[i + 1..],
                    work_dir,
                });
            }
        }
        None
    }

    /// True when this is `git <subcommand>`.
    pub fn is_git(&self, subcommand: &str) -> bool {
        self.git().is_some_and(|g| g.subcommand == subcommand)
    }
}
