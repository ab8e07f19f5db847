use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed settings in {}: {source}", path.display())]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid settings in {}: {reason}", path.display())]
    InvalidSettings { path: PathBuf, reason: String },

    #[error("Failed to encode settings: {0}")]
    SettingsEncode(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),

    #[error("Log setup error: {0}")]
    LogSetup(String),
}

impl AppError {
    /// Wrap a read failure with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Wrap a write failure with the path it happened on
    pub fn write(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an invalid settings error with context
    pub fn invalid_settings(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::InvalidSettings {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Whether this error means a settings file exists but cannot be used.
    pub fn is_invalid_settings(&self) -> bool {
        matches!(
            self,
            Self::SettingsParse { .. } | Self::InvalidSettings { .. }
        )
    }
}
