//! Error types for worldcontext.
//!
//! Library crates use [`WorldContextError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` and maps each case to a diagnostic line.

use std::path::PathBuf;

/// Top-level error type for all worldcontext operations.
#[derive(Debug, thiserror::Error)]
pub enum WorldContextError {
    /// No input argument was supplied.
    #[error("missing input argument")]
    Usage,

    /// Input is not valid JSON.
    #[error("Invalid JSON: {message}")]
    Parse { message: String },

    /// Input parsed, but is not a JSON array.
    #[error("Input must be a JSON array of denizens")]
    Shape,

    /// The referenced input file does not exist.
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Any other filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WorldContextError>;

impl WorldContextError {
    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    ///
    /// `NotFound` is split out so callers can report missing files distinctly.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::Io { path, source }
        }
    }
}
