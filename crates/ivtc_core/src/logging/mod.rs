//! Logging setup.
//!
//! The engine logs through `tracing` macros only. Binaries install a
//! subscriber once at startup with [`init_tracing_with_file`].

mod types;

pub use types::LogLevel;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter honouring `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(default_level)))
}

/// Log file for this run inside `logs_dir`, named after the start time.
pub fn log_file_path(logs_dir: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    logs_dir.join(format!("ivtc_{}.log", stamp))
}

/// Initialize the global subscriber: stderr, plus a log file in `logs_dir`
/// when one is given.
///
/// Should be called once at application startup. The returned guard
/// flushes the file writer on drop and must live until the program exits.
pub fn init_tracing_with_file(
    default_level: LogLevel,
    compact: bool,
    logs_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    let stderr = if compact {
        fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let (file_layer, guard) = match logs_dir.map(open_log_file) {
        Some(Ok(file)) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: Failed to open log file: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(stderr)
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(logs_dir: &Path) -> std::io::Result<fs::File> {
    fs::create_dir_all(logs_dir)?;
    fs::File::create(log_file_path(logs_dir))
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub(crate) fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

/// Convert LogLevel to filter string.
fn level_to_filter_str(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_to_filter_works() {
        assert_eq!(level_to_filter_str(LogLevel::Debug), "debug");
        assert_eq!(level_to_filter_str(LogLevel::Info), "info");
    }

    #[test]
    fn log_file_lands_in_logs_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path());
        assert_eq!(path.parent(), Some(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("ivtc_"));
        assert!(name.ends_with(".log"));

        open_log_file(&dir.path().join("nested")).unwrap();
        assert!(dir.path().join("nested").is_dir());
    }
}
