// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Error types for msglint.
//!
//! These are engine-level failures: broken configuration, git access
//! problems, cancellation. Commit findings are not errors; they travel as
//! [`crate::rules::ValidationError`] values inside the report.

use std::path::PathBuf;
use thiserror::Error;

use crate::rules::ValidationResults;

/// The main error type for msglint operations.
#[derive(Error, Debug)]
pub enum LintError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    // Git errors
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // One or more commits broke the policy
    #[error("{failed} of {total} commit(s) failed validation")]
    ValidationFailed { failed: usize, total: usize },

    // Run stopped early; carries what was evaluated before the signal
    #[error("Validation cancelled after {} commit(s)", partial.total_commits)]
    Cancelled { partial: Box<ValidationResults> },

    // Generic error with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },
}

impl LintError {
    /// Process exit code for this error.
    ///
    /// Policy violations exit with 1 so hooks and CI can tell them apart
    /// from a broken setup, which exits with 2.
    pub fn exit_code(&self) -> i32 {
        match self {
            LintError::ValidationFailed { .. } => 1,
            _ => 2,
        }
    }
}

/// Configuration-related errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("Configuration file already exists: {path}")]
    AlreadyExists { path: PathBuf },
}

/// Git-related errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotARepository,

    #[error("Failed to open repository: {message}")]
    OpenFailed { message: String },

    #[error("Failed to get branch: {message}")]
    BranchFailed { message: String },

    #[error("Invalid commit reference: {reference}")]
    InvalidReference { reference: String },

    #[error("Git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },
}

impl From<git2::Error> for GitError {
    fn from(err: git2::Error) -> Self {
        GitError::OpenFailed {
            message: err.message().to_string(),
        }
    }
}

/// Result type alias for msglint operations.
pub type Result<T> = std::result::Result<T, LintError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| LintError::WithContext {
            context: context.into(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/path/to/msglint.toml"),
        };
        assert!(err.to_string().contains("/path/to/msglint.toml"));
    }

    #[test]
    fn test_git_error_from_git2() {
        let err: GitError = git2::Error::from_str("object not found").into();
        assert!(err.to_string().contains("object not found"));
    }

    #[test]
    fn test_lint_error_from_config_error() {
        let config_err = ConfigError::InvalidValue {
            key: "jira.ignore_ticket_patterns".to_string(),
            message: "unclosed group".to_string(),
        };
        let err: LintError = config_err.into();
        assert!(err.to_string().contains("jira.ignore_ticket_patterns"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_validation_failed_exit_code() {
        let err = LintError::ValidationFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("2 of 5"));
    }

    #[test]
    fn test_cancelled_reports_partial_count() {
        let mut partial = ValidationResults::default();
        partial.total_commits = 3;
        let err = LintError::Cancelled {
            partial: Box::new(partial),
        };
        assert!(err.to_string().contains("3 commit(s)"));
    }

    #[test]
    fn test_result_ext_context() {
        let raw: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing",
        ));
        let err = raw.context("reading message file").unwrap_err();
        assert!(err.to_string().starts_with("reading message file"));
    }
}
