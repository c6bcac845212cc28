//! Tracing subscriber setup shared by the binaries.
//!
//! `INSIGHTMAP_LOG_MODE` selects the sink: `stdout` (default) or `file`, which
//! appends to `INSIGHTMAP_LOG_FILE` (default `logs/insightmap.log`). Every
//! line passes through [`SanitizingMakeWriter`]. `RUST_LOG` sets the filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::adapters::sanitize::SanitizingMakeWriter;

pub const LOG_MODE_ENV: &str = "INSIGHTMAP_LOG_MODE";
pub const LOG_FILE_ENV: &str = "INSIGHTMAP_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "logs/insightmap.log";

/// Log sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Stdout,
    File,
}

impl LogMode {
    /// Read the mode from the environment. Unknown values fall back to stdout.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(LOG_MODE_ENV).as_deref().map(str::trim) {
            Ok("file") => Self::File,
            _ => Self::Stdout,
        }
    }
}

/// Install the global subscriber.
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes and stops the background writer.
///
/// # Errors
/// Returns error if the log file cannot be opened.
pub fn init() -> crate::Result<WorkerGuard> {
    let (writer, guard) = match LogMode::from_env() {
        LogMode::File => {
            let log_file =
                std::env::var(LOG_FILE_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
            if let Some(parent) = Path::new(&log_file).parent() {
                // Best-effort; opening the file reports the real failure.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)?;
            tracing_appender::non_blocking(file)
        }
        LogMode::Stdout => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}
