// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Subject quality rule: length, case, ending, imperative mood.

use crate::commit::{subject_text, Commit};
use crate::config::{RuleConfiguration, SubjectCase};

use super::imperative::VerbForm;
use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

/// Composite subject check. Sub-checks are independent and all of them run,
/// except on an empty subject which is reported once.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubjectRule;

impl SubjectRule {
    const NAME: &'static str = "Subject";

    fn check_length(&self, subject: &str, max: usize) -> Option<ValidationError> {
        let length = subject.chars().count();
        if length <= max {
            return None;
        }
        Some(
            ValidationError::new(
                Self::NAME,
                ErrorCode::SubjectTooLong,
                format!("Subject is too long: {} characters (max: {})", length, max),
            )
            .with_context("actual_length", length)
            .with_context("max_length", max)
            .with_help(format!("Shorten the subject to {} characters or less", max)),
        )
    }

    fn check_case(&self, text: &str, case: SubjectCase) -> Option<ValidationError> {
        let first = text.chars().next().filter(|c| c.is_alphabetic())?;

        let (ok, expected) = match case {
            SubjectCase::Ignore => return None,
            SubjectCase::Lower => (!first.is_uppercase(), "lowercase"),
            SubjectCase::Upper | SubjectCase::Sentence => (!first.is_lowercase(), "uppercase"),
        };
        if ok {
            return None;
        }

        Some(
            ValidationError::new(
                Self::NAME,
                ErrorCode::SubjectCase,
                format!("Subject should start with a {} letter", expected),
            )
            .with_context("expected_case", case)
            .with_context("first_letter", first)
            .with_help(format!("Start the subject with a {} letter", expected)),
        )
    }

    fn check_suffix(&self, subject: &str, forbidden: &[String]) -> Option<ValidationError> {
        let subject = subject.trim_end();
        let ending = forbidden
            .iter()
            .find(|ending| !ending.is_empty() && subject.ends_with(ending.as_str()))?;

        Some(
            ValidationError::new(
                Self::NAME,
                ErrorCode::SubjectSuffix,
                format!("Subject should not end with '{}'", ending),
            )
            .with_context("suffix", ending)
            .with_help(format!("Remove the trailing '{}'", ending)),
        )
    }

    fn check_imperative(&self, text: &str, config: &RuleConfiguration) -> Option<ValidationError> {
        let word = text.split_whitespace().next()?;
        let form = config.subject.imperative.classify(word);
        if form == VerbForm::Imperative {
            return None;
        }

        let found = match form {
            VerbForm::PastTense => "past tense",
            VerbForm::Gerund => "a gerund",
            _ => "third person",
        };
        Some(
            ValidationError::new(
                Self::NAME,
                ErrorCode::NonImperative,
                format!("Subject should use imperative mood, '{}' is {}", word, found),
            )
            .with_context("word", word)
            .with_context("form", form)
            .with_help("Write the subject as a command, e.g. 'add' instead of 'added' or 'adds'"),
        )
    }
}

impl Rule for SubjectRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "subject"
    }

    fn description(&self) -> &'static str {
        "Subject length, first-letter case, ending, and imperative mood"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let subject = commit.subject.as_str();
        if subject.trim().is_empty() {
            return vec![
                ValidationError::new(Self::NAME, ErrorCode::MissingSubject, "Subject is missing")
                    .with_help("Start the message with a one-line summary"),
            ];
        }

        let policy = &config.subject;
        let text = subject_text(subject);

        let mut errors = Vec::new();
        errors.extend(self.check_length(subject, policy.max_length));
        errors.extend(self.check_case(text, policy.case));
        errors.extend(self.check_suffix(subject, &policy.forbid_endings));
        if policy.require_imperative {
            errors.extend(self.check_imperative(text, config));
        }
        errors
    }
}
