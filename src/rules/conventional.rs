// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Conventional commit grammar rule.

use crate::commit::{Commit, ConventionalHeader};
use crate::config::RuleConfiguration;

use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

/// Checks `type(scope)!: description` subjects.
///
/// Checks run in a fixed order and stop at the first failure, so a commit
/// gets exactly one conventional-commit finding.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConventionalCommitRule;

impl ConventionalCommitRule {
    const NAME: &'static str = "ConventionalCommit";

    fn check(&self, subject: &str, config: &RuleConfiguration) -> Option<ValidationError> {
        let policy = &config.conventional;

        let header = match ConventionalHeader::parse(subject) {
            Some(header) => header,
            None => {
                return Some(
                    ValidationError::new(
                        Self::NAME,
                        ErrorCode::InvalidFormat,
                        "Subject does not follow the conventional commit format",
                    )
                    .with_context("subject", subject)
                    .with_help("Write the subject as: type(scope): description"),
                );
            }
        };

        if !policy.allows_type(header.commit_type) {
            let mut allowed: Vec<&str> = vec!["feat", "fix"];
            for t in &policy.types {
                if !allowed.contains(&t.as_str()) {
                    allowed.push(t);
                }
            }
            return Some(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::InvalidType,
                    format!("Commit type '{}' is not allowed", header.commit_type),
                )
                .with_context("type", header.commit_type)
                .with_context("allowed_types", allowed.join(","))
                .with_help(format!("Use one of: {}", allowed.join(", "))),
            );
        }

        if let Some(scope) = header
            .scopes()
            .into_iter()
            .find(|scope| scope.is_empty() || !policy.allows_scope(scope))
        {
            return Some(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::InvalidScope,
                    format!("Scope '{}' is not allowed", scope),
                )
                .with_context("scope", scope)
                .with_help("Use a scope that matches one of the configured scope patterns"),
            );
        }

        if !header.has_single_space() {
            return Some(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::SpacingError,
                    "Expected exactly one space after the colon",
                )
                .with_context("spaces", header.spacing.chars().count())
                .with_help("Put a single space between ':' and the description"),
            );
        }

        let description = header.description.trim();
        if description.is_empty() {
            return Some(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::EmptyDescription,
                    "Description is empty",
                )
                .with_help("Describe the change after the colon"),
            );
        }

        let length = header.description.trim_end().chars().count();
        if length > policy.max_description_length {
            return Some(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::DescriptionTooLong,
                    format!(
                        "Description is too long: {} characters (max: {})",
                        length, policy.max_description_length
                    ),
                )
                .with_context("actual_length", length)
                .with_context("max_length", policy.max_description_length)
                .with_help(format!(
                    "Shorten the description to {} characters or less",
                    policy.max_description_length
                )),
            );
        }

        None
    }
}

impl Rule for ConventionalCommitRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "conventional-commit"
    }

    fn description(&self) -> &'static str {
        "Subject follows type(scope)!: description with allowed types and scopes"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        self.check(&commit.subject, config).into_iter().collect()
    }
}
