// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The rule capability.

use crate::commit::Commit;
use crate::config::RuleConfiguration;

use super::result::ValidationError;

/// A validation rule.
///
/// Rules are pure: the same commit and configuration always produce the same
/// findings, and no rule keeps state between calls.
pub trait Rule: std::fmt::Debug + Send + Sync {
    /// Stable display name, e.g. `ConventionalCommit`. Results are ordered by it.
    fn name(&self) -> &'static str;

    /// Stable kebab-case id, e.g. `conventional-commit`.
    fn id(&self) -> &'static str;

    /// One-line description for listings.
    fn description(&self) -> &'static str;

    /// Check the commit and return every finding.
    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError>;

    /// Whether `key` names this rule, by name or by id.
    fn matches(&self, key: &str) -> bool {
        key == self.name() || key == self.id()
    }
}
