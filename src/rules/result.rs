// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Validation result types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::commit::Commit;

use super::rule::Rule;

/// Stable finding codes. Every rule draws from its own slice of this list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Conventional commit grammar
    InvalidFormat,
    InvalidType,
    InvalidScope,
    SpacingError,
    EmptyDescription,
    DescriptionTooLong,

    // JIRA references
    EmptySubject,
    MissingJiraKeySubject,
    JiraKeyNotAtEnd,
    InvalidProject,
    InvalidKeyFormat,
    MissingJiraKeyBody,
    RefsAfterSignoff,

    // Sign-off trailers
    MissingSignoff,
    InsufficientSignoffs,
    MisplacedSignoff,

    // Subject quality
    MissingSubject,
    SubjectTooLong,
    SubjectCase,
    SubjectSuffix,
    NonImperative,

    // Body
    MissingBlankLine,
    MissingBody,
    BodyTooShort,

    // Signatures
    MissingSignature,
    UnknownSignatureFormat,
    DisallowedSignatureType,

    // Spelling
    Misspelling,

    // Branch state
    TooManyCommits,

    // Engine-level problems surfaced through a rule
    ConfigurationError,
    GitOperationFailed,
}

impl ErrorCode {
    /// Get the string representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidFormat => "invalid_format",
            ErrorCode::InvalidType => "invalid_type",
            ErrorCode::InvalidScope => "invalid_scope",
            ErrorCode::SpacingError => "spacing_error",
            ErrorCode::EmptyDescription => "empty_description",
            ErrorCode::DescriptionTooLong => "description_too_long",
            ErrorCode::EmptySubject => "empty_subject",
            ErrorCode::MissingJiraKeySubject => "missing_jira_key_subject",
            ErrorCode::JiraKeyNotAtEnd => "jira_key_not_at_end",
            ErrorCode::InvalidProject => "invalid_project",
            ErrorCode::InvalidKeyFormat => "invalid_key_format",
            ErrorCode::MissingJiraKeyBody => "missing_jira_key_body",
            ErrorCode::RefsAfterSignoff => "refs_after_signoff",
            ErrorCode::MissingSignoff => "missing_signoff",
            ErrorCode::InsufficientSignoffs => "insufficient_signoffs",
            ErrorCode::MisplacedSignoff => "misplaced_signoff",
            ErrorCode::MissingSubject => "missing_subject",
            ErrorCode::SubjectTooLong => "subject_too_long",
            ErrorCode::SubjectCase => "subject_case",
            ErrorCode::SubjectSuffix => "subject_suffix",
            ErrorCode::NonImperative => "non_imperative",
            ErrorCode::MissingBlankLine => "missing_blank_line",
            ErrorCode::MissingBody => "missing_body",
            ErrorCode::BodyTooShort => "body_too_short",
            ErrorCode::MissingSignature => "missing_signature",
            ErrorCode::UnknownSignatureFormat => "unknown_signature_format",
            ErrorCode::DisallowedSignatureType => "disallowed_signature_type",
            ErrorCode::Misspelling => "misspelling",
            ErrorCode::TooManyCommits => "too_many_commits",
            ErrorCode::ConfigurationError => "configuration_error",
            ErrorCode::GitOperationFailed => "git_operation_failed",
        }
    }

    /// Whether the code reports a broken validator setup rather than a
    /// non-compliant commit.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ErrorCode::ConfigurationError | ErrorCode::GitOperationFailed
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding produced by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Name of the rule that produced the finding.
    pub rule: String,
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Rule-specific details, e.g. `max_length`.
    pub context: BTreeMap<String, String>,
    /// How to fix it.
    pub help: String,
}

impl ValidationError {
    /// Create a finding with no context and no help.
    pub fn new(rule: &str, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            code,
            message: message.into(),
            context: BTreeMap::new(),
            help: String::new(),
        }
    }

    /// Attach a context entry.
    pub fn with_context(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    /// Attach remediation text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Whether this finding is about the validator setup.
    pub fn is_configuration_error(&self) -> bool {
        self.code.is_configuration_error()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self
                .context
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            write!(f, " ({})", pairs.join(", "))?;
        }
        Ok(())
    }
}

/// Outcome of one rule against one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    Passed,
    Failed,
    Skipped,
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Passed => write!(f, "passed"),
            RuleStatus::Failed => write!(f, "failed"),
            RuleStatus::Skipped => write!(f, "skipped"),
        }
    }
}

/// Result of one rule against one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub rule_id: String,
    pub rule_name: String,
    pub status: RuleStatus,
    /// One-line summary.
    pub message: String,
    /// Every finding, one per line.
    pub verbose_message: String,
    /// Remediation hints, one per line.
    pub help_message: String,
    pub errors: Vec<ValidationError>,
}

impl RuleResult {
    /// Wrap the findings of an evaluated rule.
    pub fn evaluated(rule: &dyn Rule, errors: Vec<ValidationError>) -> Self {
        if errors.is_empty() {
            return Self {
                rule_id: rule.id().to_string(),
                rule_name: rule.name().to_string(),
                status: RuleStatus::Passed,
                message: "No errors".to_string(),
                verbose_message: format!("{} passed", rule.name()),
                help_message: String::new(),
                errors,
            };
        }

        let message = match errors.len() {
            1 => errors[0].message.clone(),
            n => format!("{} (and {} more)", errors[0].message, n - 1),
        };
        let verbose_message = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n");

        let mut hints: Vec<&str> = Vec::new();
        for error in &errors {
            if !error.help.is_empty() && !hints.contains(&error.help.as_str()) {
                hints.push(&error.help);
            }
        }
        let help_message = hints.join("\n");

        Self {
            rule_id: rule.id().to_string(),
            rule_name: rule.name().to_string(),
            status: RuleStatus::Failed,
            message,
            verbose_message,
            help_message,
            errors,
        }
    }

    /// Result for a rule that is inactive in this run.
    pub fn skipped(rule: &dyn Rule) -> Self {
        Self {
            rule_id: rule.id().to_string(),
            rule_name: rule.name().to_string(),
            status: RuleStatus::Skipped,
            message: "Rule is disabled".to_string(),
            verbose_message: format!("{} was not evaluated", rule.name()),
            help_message: String::new(),
            errors: Vec::new(),
        }
    }

    /// Whether the rule ran and failed.
    pub fn is_failed(&self) -> bool {
        self.status == RuleStatus::Failed
    }
}

/// Result of every rule against one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitResult {
    pub commit: Commit,
    /// Sorted by rule name.
    pub rule_results: Vec<RuleResult>,
    pub passed: bool,
}

impl CommitResult {
    /// Assemble a commit result. Rule results are put in name order no
    /// matter the order they arrive in.
    pub fn new(commit: Commit, mut rule_results: Vec<RuleResult>) -> Self {
        rule_results.sort_by(|a, b| a.rule_name.cmp(&b.rule_name));
        let passed = rule_results
            .iter()
            .all(|r| r.status != RuleStatus::Failed);

        Self {
            commit,
            rule_results,
            passed,
        }
    }

    /// Failed rule results.
    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.rule_results.iter().filter(|r| r.is_failed())
    }

    /// Total number of findings.
    pub fn error_count(&self) -> usize {
        self.rule_results.iter().map(|r| r.errors.len()).sum()
    }
}

/// Results for a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResults {
    pub total_commits: usize,
    pub passed_commits: usize,
    pub commit_results: Vec<CommitResult>,
    /// Rule name to number of commits that failed it.
    pub rule_summary: BTreeMap<String, usize>,
}

impl ValidationResults {
    /// Append one commit's result and update the running totals.
    pub fn add(&mut self, result: CommitResult) {
        self.total_commits += 1;
        if result.passed {
            self.passed_commits += 1;
        }

        for rule in &result.rule_results {
            if rule.status == RuleStatus::Skipped {
                continue;
            }
            let failures = self.rule_summary.entry(rule.rule_name.clone()).or_insert(0);
            if rule.is_failed() {
                *failures += 1;
            }
        }

        self.commit_results.push(result);
    }

    /// Number of commits with at least one failed rule.
    pub fn failed_commits(&self) -> usize {
        self.total_commits - self.passed_commits
    }

    /// Whether every commit passed.
    pub fn all_passed(&self) -> bool {
        self.passed_commits == self.total_commits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfiguration;

    #[derive(Debug)]
    struct Dummy(&'static str);

    impl Rule for Dummy {
        fn name(&self) -> &'static str {
            self.0
        }

        fn id(&self) -> &'static str {
            "dummy"
        }

        fn description(&self) -> &'static str {
            "test rule"
        }

        fn validate(&self, _commit: &Commit, _config: &RuleConfiguration) -> Vec<ValidationError> {
            Vec::new()
        }
    }

    fn error(code: ErrorCode, help: &str) -> ValidationError {
        ValidationError::new("Dummy", code, format!("{} happened", code)).with_help(help)
    }

    #[test]
    fn test_error_code_serializes_as_snake_case() {
        let json = serde_json::to_string(&ErrorCode::DescriptionTooLong).unwrap();
        assert_eq!(json, "\"description_too_long\"");
        assert_eq!(ErrorCode::JiraKeyNotAtEnd.as_str(), "jira_key_not_at_end");
    }

    #[test]
    fn test_configuration_codes() {
        assert!(ErrorCode::ConfigurationError.is_configuration_error());
        assert!(ErrorCode::GitOperationFailed.is_configuration_error());
        assert!(!ErrorCode::InvalidType.is_configuration_error());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::new("Subject", ErrorCode::SubjectTooLong, "Subject too long")
            .with_context("max_length", 72)
            .with_context("actual_length", 80);
        assert_eq!(
            err.to_string(),
            "[subject_too_long] Subject too long (actual_length=80, max_length=72)"
        );
    }

    #[test]
    fn test_rule_result_status_follows_errors() {
        let rule = Dummy("Dummy");
        let passed = RuleResult::evaluated(&rule, Vec::new());
        assert_eq!(passed.status, RuleStatus::Passed);

        let failed = RuleResult::evaluated(
            &rule,
            vec![
                error(ErrorCode::InvalidType, "use feat"),
                error(ErrorCode::InvalidScope, "use feat"),
            ],
        );
        assert_eq!(failed.status, RuleStatus::Failed);
        assert!(failed.message.contains("and 1 more"));
        assert_eq!(failed.verbose_message.lines().count(), 2);
        assert_eq!(failed.help_message, "use feat");

        let skipped = RuleResult::skipped(&rule);
        assert_eq!(skipped.status, RuleStatus::Skipped);
        assert!(skipped.errors.is_empty());
    }

    #[test]
    fn test_commit_result_sorts_and_ignores_skipped() {
        let results = vec![
            RuleResult::evaluated(&Dummy("Zeta"), Vec::new()),
            RuleResult::skipped(&Dummy("Alpha")),
        ];
        let commit_result = CommitResult::new(Commit::default(), results);

        assert_eq!(commit_result.rule_results[0].rule_name, "Alpha");
        assert!(commit_result.passed);
    }

    #[test]
    fn test_validation_results_totals() {
        let mut results = ValidationResults::default();
        results.add(CommitResult::new(
            Commit::default(),
            vec![RuleResult::evaluated(
                &Dummy("Subject"),
                vec![error(ErrorCode::SubjectCase, "")],
            )],
        ));
        results.add(CommitResult::new(
            Commit::default(),
            vec![
                RuleResult::evaluated(&Dummy("Subject"), Vec::new()),
                RuleResult::skipped(&Dummy("Spell")),
            ],
        ));

        assert_eq!(results.total_commits, 2);
        assert_eq!(results.passed_commits, 1);
        assert_eq!(results.failed_commits(), 1);
        assert_eq!(results.rule_summary.get("Subject"), Some(&1));
        assert!(!results.rule_summary.contains_key("Spell"));
    }
}
