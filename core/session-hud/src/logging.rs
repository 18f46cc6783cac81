//! Tracing setup. Interactive screens log to a file so output never lands on the
//! terminal they draw to.

use std::env;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";
const LOG_FILE_PREFIX: &str = "fx-hud.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

fn env_filter() -> EnvFilter {
    let debug_enabled = env::var("FX_HUD_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        return EnvFilter::new("debug");
    }

    env::var("FX_HUD_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installed subscriber. Keep it alive for the life of the process; dropping it
/// flushes and stops the file writer.
pub struct Logging {
    target: LogTarget,
    _guard: Option<WorkerGuard>,
}

impl Logging {
    /// Where log lines actually go, which may differ from what was requested.
    pub fn target(&self) -> LogTarget {
        self.target
    }
}

fn prepare_log_dir(log_dir: Option<PathBuf>) -> Option<PathBuf> {
    let log_dir = log_dir?;
    fs_err::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}

/// Falls back to stderr when the file target cannot be set up.
pub fn init(target: LogTarget) -> Logging {
    let filter = env_filter();

    if target == LogTarget::File {
        let requested = fx_session_core::config::data_dir().map(|dir| dir.join("logs"));
        if let Some(log_dir) = prepare_log_dir(requested) {
            let appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            tracing::debug!(log_dir = %log_dir.display(), "File logging initialized");
            return Logging {
                target: LogTarget::File,
                _guard: Some(guard),
            };
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    if target == LogTarget::File {
        tracing::warn!("Log directory unavailable; logging to stderr");
    }
    Logging {
        target: LogTarget::Stderr,
        _guard: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_dir_is_created_when_missing() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let log_dir = temp_dir.path().join("nested").join("logs");

        assert_eq!(prepare_log_dir(Some(log_dir.clone())), Some(log_dir.clone()));
        assert!(log_dir.is_dir());
    }

    #[test]
    fn unusable_log_dir_falls_back() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let blocker = temp_dir.path().join("logs");
        fs_err::write(&blocker, "not a directory").expect("write file");

        assert_eq!(prepare_log_dir(Some(blocker.join("inner"))), None);
        assert_eq!(prepare_log_dir(None), None);
    }
}
