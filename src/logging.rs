use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::LoggingConfig;
use crate::hook::Response;

/// Install the file logger described by `cfg`.
/// Best-effort: failures are silently ignored (logging must never block the hook).
pub fn init(cfg: &LoggingConfig) {
    let level = level_filter(&cfg.level);
    let Some(path) = log_path(&cfg.file) else {
        return;
    };
    if level == LevelFilter::Off {
        return;
    }
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, file);
}

/// Unknown or empty levels fall back to `info`.
fn level_filter(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::Info)
}

fn log_path(file: &str) -> Option<PathBuf> {
    let file = file.trim();
    if file.is_empty() {
        return None;
    }
    Some(PathBuf::from(shellexpand::tilde(file).as_ref()))
}

/// Record one hook outcome as a single line.
pub fn log_decision(subject: &str, response: &Response) {
    let subject: String = subject.chars().take(200).collect();
    match response {
        Response::Defer => log::info!("defer\t{subject}"),
        Response::Decision(d) => {
            // Compact single-line reason for the log (replace newlines with "; ")
            let reason = d.reason.replace('\n', "; ");
            let triggered = d.triggered.join(",");
            log::info!("{}\t{subject}\t{triggered}\t{reason}", d.decision.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(level_filter("debug"), LevelFilter::Debug);
        assert_eq!(level_filter("WARN"), LevelFilter::Warn);
        assert_eq!(level_filter("off"), LevelFilter::Off);
        assert_eq!(level_filter(""), LevelFilter::Info);
        assert_eq!(level_filter("loud"), LevelFilter::Info);
    }

    #[test]
    fn empty_path_disables_file_logging() {
        assert!(log_path("").is_none());
        assert!(log_path("   ").is_none());
    }

    #[test]
    fn tilde_is_expanded() {
        let path = log_path("~/logs/decisions.log").unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("logs/decisions.log"));
    }
}
