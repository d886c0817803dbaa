// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Message body layout and length.

use lazy_static::lazy_static;
use regex::Regex;

use crate::commit::Commit;
use crate::config::RuleConfiguration;

use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

lazy_static! {
    /// Git trailer line, e.g. `Signed-off-by: ...` or `Refs: ...`.
    static ref TRAILER: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9-]*: \S").unwrap();
}

/// Whether a body line is a trailer rather than prose.
pub fn is_trailer(line: &str) -> bool {
    TRAILER.is_match(line.trim_end())
}

/// Checks the blank separator line and, when configured, body presence and
/// length. Trailers do not count as body content.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitBodyRule;

impl CommitBodyRule {
    const NAME: &'static str = "CommitBody";

    fn content_length(commit: &Commit) -> usize {
        commit
            .body_lines()
            .filter(|line| !is_trailer(line))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .chars()
            .count()
    }
}

impl Rule for CommitBodyRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "commit-body"
    }

    fn description(&self) -> &'static str {
        "Body is separated from the subject and long enough when required"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let mut lines = commit
            .message
            .lines()
            .skip_while(|line| line.trim().is_empty())
            .skip(1);
        if let Some(second) = lines.next() {
            if !second.trim().is_empty() {
                errors.push(
                    ValidationError::new(
                        Self::NAME,
                        ErrorCode::MissingBlankLine,
                        "Subject and body must be separated by a blank line",
                    )
                    .with_context("line", second.trim())
                    .with_help("Insert an empty line after the subject"),
                );
            }
        }

        if commit.is_merge_commit {
            return errors;
        }

        let policy = &config.body;
        let length = Self::content_length(commit);
        if length == 0 {
            if policy.required {
                errors.push(
                    ValidationError::new(Self::NAME, ErrorCode::MissingBody, "Commit body is missing")
                        .with_help("Explain what changed and why below the subject"),
                );
            }
        } else if length < policy.min_length {
            errors.push(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::BodyTooShort,
                    format!(
                        "Commit body is too short: {} characters (min: {})",
                        length, policy.min_length
                    ),
                )
                .with_context("actual_length", length)
                .with_context("min_length", policy.min_length)
                .with_help("Describe the change in more detail"),
            );
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;

    fn config(required: bool, min_length: usize) -> RuleConfiguration {
        let mut lint = LintConfig::default();
        lint.message.body.required = required;
        lint.message.body.min_length = min_length;
        RuleConfiguration::try_from(&lint).unwrap()
    }

    fn codes(commit: &Commit, config: &RuleConfiguration) -> Vec<ErrorCode> {
        CommitBodyRule
            .validate(commit, config)
            .into_iter()
            .map(|e| e.code)
            .collect()
    }

    #[test]
    fn test_is_trailer() {
        assert!(is_trailer("Signed-off-by: Dev <dev@example.com>"));
        assert!(is_trailer("Refs: ABC-1"));
        assert!(is_trailer("Co-authored-by: Ops <ops@example.com>"));
        assert!(!is_trailer("This fixes: the thing"));
        assert!(!is_trailer("plain text"));
    }

    #[test]
    fn test_defaults_accept_subject_only() {
        let commit = Commit::from_message("", "feat: x");
        assert!(codes(&commit, &config(false, 0)).is_empty());
    }

    #[test]
    fn test_missing_blank_line() {
        let commit = Commit::from_message("", "feat: x\nbody right away");
        assert_eq!(codes(&commit, &config(false, 0)), vec![ErrorCode::MissingBlankLine]);

        let fine = Commit::from_message("", "\nfeat: x\n\nbody");
        assert!(codes(&fine, &config(false, 0)).is_empty());
    }

    #[test]
    fn test_required_body_ignores_trailers() {
        let commit = Commit::from_message("", "feat: x\n\nSigned-off-by: Dev <dev@example.com>");
        assert_eq!(codes(&commit, &config(true, 0)), vec![ErrorCode::MissingBody]);

        let with_body = Commit::from_message("", "feat: x\n\nExplain it.");
        assert!(codes(&with_body, &config(true, 0)).is_empty());
    }

    #[test]
    fn test_body_too_short() {
        let commit = Commit::from_message("", "feat: x\n\nshort");
        let errors = CommitBodyRule.validate(&commit, &config(false, 20));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, ErrorCode::BodyTooShort);
        assert_eq!(errors[0].context["actual_length"], "5");
    }

    #[test]
    fn test_merge_commits_skip_body_requirements() {
        let commit = Commit::from_message("", "Merge branch 'dev'").with_merge(true);
        assert!(codes(&commit, &config(true, 20)).is_empty());
    }
}
