// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! msglint - Commit message policy checker
//!
//! Validates git commit messages against a configurable set of rules and
//! reports per-commit, per-rule results.
//!
//! # Features
//!
//! - **Conventional Commits**: type, scope and description grammar
//! - **JIRA References**: ticket keys in the subject and `Refs:` trailers
//! - **Sign-offs**: strict DCO `Signed-off-by` trailers with distinct signers
//! - **Subject Quality**: length, case, ending and imperative mood
//! - **Signatures, Spelling, Branch Limits**: opt-in rules
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use msglint::commit::Commit;
//! use msglint::config::{LintConfig, RuleConfiguration};
//! use msglint::rules::{RuleRegistry, ValidationEngine};
//!
//! let config = LintConfig::load().unwrap();
//! let rule_config = RuleConfiguration::try_from(&config).unwrap();
//!
//! let mut registry = RuleRegistry::with_defaults(None, None);
//! registry.apply_policy(
//!     &rule_config.enabled_rules,
//!     &rule_config.effective_disabled_rules(),
//! );
//!
//! let engine = ValidationEngine::new(registry, Arc::new(rule_config));
//! let result = engine
//!     .validate_commit(&Commit::from_message("", "feat(api): add token refresh"))
//!     .unwrap();
//! assert!(result.passed);
//! ```

// Module declarations
pub mod cli;
pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod report;
pub mod rules;

// Re-exports for convenience
pub use config::LintConfig;
pub use error::{LintError, Result};

/// Version information embedded at compile time.
pub mod version {
    /// The current version of msglint.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");

    /// The git SHA at compile time (if available).
    pub const GIT_SHA: Option<&str> = option_env!("VERGEN_GIT_SHA");

    /// The git commit date at compile time (if available).
    pub const GIT_COMMIT_DATE: Option<&str> = option_env!("VERGEN_GIT_COMMIT_DATE");

    /// Get a formatted version string.
    pub fn version_string() -> String {
        match (GIT_SHA, GIT_COMMIT_DATE) {
            (Some(sha), Some(date)) => {
                format!("{} ({} {})", VERSION, &sha[..7.min(sha.len())], date)
            }
            (Some(sha), None) => {
                format!("{} ({})", VERSION, &sha[..7.min(sha.len())])
            }
            _ => VERSION.to_string(),
        }
    }
}
