use std::fmt;
use std::path::PathBuf;

use crate::formats::FormatError;
use crate::script::ScriptError;
use crate::settings::ConfigError;
use crate::store::StoreError;

/// Top-level failure surfaced by the binary.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Format(FormatError),
    Store(StoreError),
    Script(ScriptError),
    InputNotFound {
        path: PathBuf,
    },
    UnreadableInput {
        path: PathBuf,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => fmt::Display::fmt(err, f),
            AppError::Format(err) => fmt::Display::fmt(err, f),
            AppError::Store(err) => fmt::Display::fmt(err, f),
            AppError::Script(err) => fmt::Display::fmt(err, f),
            AppError::InputNotFound { path } => {
                write!(f, "input file '{}' does not exist", path.display())
            }
            AppError::UnreadableInput { path } => {
                write!(
                    f,
                    "cannot tell a readable subtitle format from '{}' (expected .srt or .json)",
                    path.display()
                )
            }
            AppError::Io { path, source } => {
                write!(f, "i/o failure at '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Format(err) => Some(err),
            AppError::Store(err) => Some(err),
            AppError::Script(err) => Some(err),
            AppError::Io { source, .. } => Some(source),
            AppError::InputNotFound { .. } | AppError::UnreadableInput { .. } => None,
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<FormatError> for AppError {
    fn from(err: FormatError) -> Self {
        AppError::Format(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<ScriptError> for AppError {
    fn from(err: ScriptError) -> Self {
        AppError::Script(err)
    }
}
