use std::fs;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::AppError;

pub const LOG_FILE_NAME: &str = "teleprompter.log";

const DEFAULT_DIRECTIVE: &str = "teleprompter=info";

/// Directory for log files when no path is given.
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("teleprompter")
        .join("logs")
}

/// Where log output goes and how the file rotates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocation {
    pub dir: PathBuf,
    pub file_name: String,
    pub rotation: Rotation,
}

impl LogLocation {
    /// Resolve the log location from an optional user path.
    ///
    /// A user path is written exactly as given, without rotation. The
    /// default is a daily file, `teleprompter.log.YYYY-MM-DD`, in the
    /// per-user data directory. A path without a parent logs to the
    /// current directory.
    pub fn resolve(custom: Option<&Path>) -> Self {
        match custom {
            Some(path) => {
                let parent = path
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .unwrap_or(Path::new("."));
                let file_name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or(LOG_FILE_NAME);
                LogLocation {
                    dir: parent.to_path_buf(),
                    file_name: file_name.to_string(),
                    rotation: Rotation::NEVER,
                }
            }
            None => LogLocation {
                dir: default_log_dir(),
                file_name: LOG_FILE_NAME.to_string(),
                rotation: Rotation::DAILY,
            },
        }
    }

    /// The file written to, or the file name prefix for daily rotation.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }
}

/// Sets up file logging for the application.
///
/// The terminal belongs to the TUI, so logs go only to a file.
/// `RUST_LOG` is honoured on top of the default `teleprompter=info`.
///
/// Returns where logs go and the guard that must be kept alive for the
/// duration of the program to ensure proper log flushing.
pub fn init_logging(log_file: Option<&Path>) -> Result<(LogLocation, WorkerGuard), AppError> {
    let location = LogLocation::resolve(log_file);

    if !location.dir.exists() {
        fs::create_dir_all(&location.dir).map_err(|e| {
            AppError::log_setup_error(format!(
                "Failed to create log directory {}: {e}",
                location.dir.display()
            ))
        })?;
    }

    let file_appender = RollingFileAppender::new(
        location.rotation.clone(),
        &location.dir,
        &location.file_name,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let directive: Directive = DEFAULT_DIRECTIVE
        .parse()
        .map_err(|e| AppError::log_setup_error(format!("Bad log directive: {e}")))?;

    tracing_subscriber::registry()
        .with(
            fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env().add_directive(directive)),
        )
        .try_init()
        .map_err(|e| AppError::log_setup_error(e.to_string()))?;

    Ok((location, guard))
}
