//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;
use tpcheck_schemas::ValidationError;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configuration file is not valid JSON
    #[error("Cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// One or more projects failed validation
    #[error("{invalid} of {total} project(s) failed validation")]
    Validation { invalid: usize, total: usize },

    /// The validator refused its input
    #[error("Validator error: {0}")]
    Validator(#[from] ValidationError),

    /// Project directory not found
    #[error("Project directory not found: {}", path.display())]
    ProjectNotFound { path: PathBuf },

    /// A required configuration file is missing from a project
    #[error("Missing {} in project {}", file, project.display())]
    MissingConfiguration { project: PathBuf, file: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_)
            | Self::Json(_)
            | Self::Yaml(_)
            | Self::Parse { .. }
            | Self::ProjectNotFound { .. }
            | Self::MissingConfiguration { .. } => 1,
            Self::Validation { .. } => 2,
            Self::Config(_) => 5,
            Self::Validator(_) | Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::ProjectNotFound { .. })
    }
}

/// Extension trait for displaying errors with context
pub trait ErrorContext<T> {
    /// Add context to an error
    fn context(self, msg: &str) -> Result<T>;

    /// Add context with a closure (only evaluated on error)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn context(self, msg: &str) -> Result<T> {
        self.with_context(|| msg.to_string())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            // Keep the variant so the exit code survives
            Error::Io(inner) => Error::Io(io::Error::new(inner.kind(), format!("{}: {}", f(), inner))),
            Error::Config(message) => Error::Config(format!("{}: {}", f(), message)),
            inner => Error::Other {
                message: format!("{}: {}", f(), inner),
            },
        })
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::from(io::Error::new(io::ErrorKind::NotFound, "gone")).exit_code(), 1);
        assert_eq!(
            Error::MissingConfiguration {
                project: PathBuf::from("demo"),
                file: "project.json".to_string(),
            }
            .exit_code(),
            1
        );
        assert_eq!(Error::Validation { invalid: 1, total: 2 }.exit_code(), 2);
        assert_eq!(Error::config("bad").exit_code(), 5);
        assert_eq!(Error::other("boom").exit_code(), 99);
    }

    #[test]
    fn test_parse_errors_exit_with_one() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(Error::from(err).exit_code(), 1);
    }

    #[test]
    fn test_context_keeps_io_kind() {
        let result: std::result::Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result.context("Reading demo/project.json").unwrap_err();
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("Reading demo/project.json: gone"));
    }

    #[test]
    fn test_format_error_without_color() {
        let formatted = format_error(&Error::config("unknown output format 'xml'"), false);
        assert_eq!(formatted, "Error: Configuration error: unknown output format 'xml'");
    }
}
