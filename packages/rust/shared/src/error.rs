//! Error types for laradocs.
//!
//! Library crates use [`LaradocsError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all laradocs operations.
#[derive(Debug, thiserror::Error)]
pub enum LaradocsError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error (transport failure or non-success status).
    #[error("network error: {0}")]
    Network(String),

    /// Expected page structure missing or unparsable.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (unexpected URL shape, empty result, etc.).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// HTML-to-Markdown conversion error.
    #[error("conversion error: {0}")]
    Conversion(String),

    /// Interactive terminal could not be driven (raw mode, drawing, input).
    #[error("terminal error: {0}")]
    Terminal(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LaradocsError>;

impl LaradocsError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = LaradocsError::parse("div.docs_sidebar not found");
        assert_eq!(err.to_string(), "parse error: div.docs_sidebar not found");

        let err = LaradocsError::Network("https://laravel.com/docs: HTTP 503".into());
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn io_error_names_path() {
        let err = LaradocsError::io(
            "docs/11.x/installation.md",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("installation.md"));
        assert!(msg.contains("denied"));
    }
}
