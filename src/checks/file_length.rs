//! Line-count gate for Write/Edit tool calls on source files.

use std::collections::HashSet;
use std::path::Path;

use crate::config::Settings;
use crate::eval::CheckResult;

/// Extensions checked when the config says `"auto"`.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &[
    // Python
    ".py", ".pyi", ".pyx",
    // JavaScript/TypeScript
    ".js", ".jsx", ".ts", ".tsx", ".mjs", ".cjs", ".d.ts",
    // Web
    ".vue", ".svelte", ".astro",
    // Systems
    ".c", ".cpp", ".cc", ".cxx", ".h", ".hpp", ".hxx", ".rs", ".go", ".zig", ".nim",
    // JVM
    ".java", ".kt", ".kts", ".scala", ".groovy", ".cljs", ".cljc",
    // .NET
    ".cs", ".vb", ".fs", ".fsi", ".fsx",
    // Scripting
    ".rb", ".php", ".swift", ".dart", ".lua", ".pl", ".pm",
    ".sh", ".bash", ".zsh", ".fish", ".ps1", ".psm1",
    // Data/stats
    ".r", ".rmd", ".jl",
    // Functional
    ".hs", ".ml", ".mli", ".re", ".rei", ".ex", ".exs", ".erl", ".hrl",
    ".scm", ".ss", ".lisp", ".lsp", ".cl",
    // Config/data formats
    ".yaml", ".yml", ".toml", ".xml", ".sql", ".graphql", ".gql", ".proto",
    // HDL and others
    ".v", ".sv", ".svh", ".ada", ".adb", ".ads",
];

/// A proposed file modification from the host.
#[derive(Debug, Clone)]
pub enum FileWrite {
    /// Whole-file write with new content.
    Write { file_path: String, content: String },
    /// In-place replacement inside an existing file.
    Edit {
        file_path: String,
        old_string: String,
        new_string: String,
        replace_all: bool,
    },
}

impl FileWrite {
    pub fn file_path(&self) -> &str {
        match self {
            FileWrite::Write { file_path, .. } | FileWrite::Edit { file_path, .. } => file_path,
        }
    }

    /// Line count of the file after the operation.
    ///
    /// An edit to a missing or unreadable file counts as zero lines.
    pub fn resulting_line_count(&self, cwd: &Path) -> usize {
        match self {
            FileWrite::Write { content, .. } => content.lines().count(),
            FileWrite::Edit {
                file_path,
                old_string,
                new_string,
                replace_all,
            } => {
                let current = match std::fs::read_to_string(cwd.join(file_path)) {
                    Ok(s) => s,
                    Err(e) => {
                        log::debug!("file length: cannot read {file_path}: {e}");
                        return 0;
                    }
                };
                let updated = if *replace_all {
                    current.replace(old_string.as_str(), new_string)
                } else {
                    current.replacen(old_string.as_str(), new_string, 1)
                };
                updated.lines().count()
            }
        }
    }
}

/// Asks before a write leaves a source file longer than `max_lines`.
/// Every other write gets no opinion.
pub struct FileLengthCheck {
    enabled: bool,
    max_lines: usize,
    extensions: HashSet<String>,
}

impl FileLengthCheck {
    pub fn from_config(settings: &Settings) -> Self {
        let cfg = &settings.file_length_limit;
        let mut extensions = HashSet::new();
        let wants_defaults =
            cfg.extensions.is_empty() || cfg.extensions.iter().any(|e| e == "auto");
        if wants_defaults {
            extensions.extend(DEFAULT_SOURCE_EXTENSIONS.iter().map(|e| e.to_string()));
        }
        for ext in cfg.extensions.iter().filter(|e| *e != "auto") {
            let ext = ext.to_lowercase();
            if ext.starts_with('.') {
                extensions.insert(ext);
            } else {
                extensions.insert(format!(".{ext}"));
            }
        }
        Self {
            enabled: settings.enabled.file_length_limit,
            max_lines: cfg.max_lines,
            extensions,
        }
    }

    pub fn name(&self) -> &'static str {
        "file_length_limit"
    }

    /// Suffix match on the file name, so multi-part entries like `.d.ts` work.
    pub fn is_source_file(&self, path: &str) -> bool {
        let Some(name) = Path::new(path).file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        let name = name.to_lowercase();
        self.extensions
            .iter()
            .any(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
    }

    /// `Some(ask)` for an oversized source file, `None` to defer.
    pub fn check(&self, write: &FileWrite, cwd: &Path) -> Option<CheckResult> {
        if !self.enabled {
            return None;
        }
        let path = write.file_path();
        if !self.is_source_file(path) {
            return None;
        }

        let lines = write.resulting_line_count(cwd);
        let max = self.max_lines;
        if lines <= max {
            return None;
        }

        Some(CheckResult::ask(format!(
            "File length limit exceeded ({lines} lines > {max} lines).\n\n\
             The resulting file `{path}` would be {lines} lines long. \
             To keep code modular, files should stay under {max} lines.\n\n\
             Would you like me to:\n\
             1. Refactor the code into smaller, more modular files?\n\
             2. Proceed with the large file anyway?"
        )))
    }
}
