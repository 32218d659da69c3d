use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a settings layer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors from querying git about the working tree.
#[derive(Debug, Error)]
pub enum GitError {
    #[error("not a git repository")]
    NotARepository,

    #[error("git command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Errors from decoding the host event.
#[derive(Debug, Error)]
pub enum HookError {
    #[error("failed to read stdin: {0}")]
    Stdin(#[from] io::Error),

    #[error("invalid hook JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field: {0}")]
    MissingField(&'static str),
}
