// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! JIRA reference rule.
//!
//! Subject keys: anywhere in a free-form subject; in a conventional subject,
//! only inside the scope or in the trailing run of key tokens at the end of
//! the description. Body keys: `Refs: KEY[, KEY]*` lines placed before the
//! first `Signed-off-by` trailer.

use lazy_static::lazy_static;
use regex::Regex;

use crate::commit::{Commit, ConventionalHeader};
use crate::config::{JiraPolicy, RuleConfiguration};

use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

lazy_static! {
    /// A key embedded in free text.
    static ref JIRA_KEY: Regex = Regex::new(r"\b([A-Z][A-Z0-9]+)-([0-9]+)\b").unwrap();

    /// A whole token that is exactly one key.
    static ref KEY_TOKEN: Regex = Regex::new(r"^[A-Z][A-Z0-9]+-[0-9]+$").unwrap();

    /// A token shaped like a key, regardless of case.
    static ref KEY_SHAPE: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9]+-[0-9]+$").unwrap();
}

const REFS_PREFIX: &str = "Refs:";
const REFS_SEPARATOR: &str = ", ";
const SIGNOFF_PREFIX: &str = "Signed-off-by:";

/// Checks JIRA key presence, placement and project.
#[derive(Debug, Default, Clone, Copy)]
pub struct JiraReferenceRule;

/// A key found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct JiraKey<'a> {
    key: &'a str,
    project: &'a str,
    offset: usize,
}

impl JiraReferenceRule {
    const NAME: &'static str = "JiraReference";

    fn validate_subject(&self, commit: &Commit, policy: &JiraPolicy) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if commit.subject.trim().is_empty() {
            if policy.require_in_subject {
                errors.push(
                    ValidationError::new(Self::NAME, ErrorCode::EmptySubject, "Subject is empty")
                        .with_help("Write a subject that ends with a JIRA key, e.g. 'add login PROJ-123'"),
                );
            }
            return errors;
        }

        let keys = find_keys(&commit.subject, policy);
        if keys.is_empty() {
            if policy.require_in_subject {
                errors.push(
                    ValidationError::new(
                        Self::NAME,
                        ErrorCode::MissingJiraKeySubject,
                        "No JIRA key found in the subject",
                    )
                    .with_help("Add the ticket key at the end of the subject, e.g. 'PROJ-123'"),
                );
            }
            return errors;
        }

        if let Some(header) = ConventionalHeader::parse(&commit.subject) {
            let tail_start = header.description_offset + trailing_keys_start(header.description);
            let misplaced: Vec<&str> = keys
                .iter()
                .filter(|k| k.offset >= header.description_offset && k.offset < tail_start)
                .map(|k| k.key)
                .collect();

            if let Some(first) = misplaced.first() {
                errors.push(
                    ValidationError::new(
                        Self::NAME,
                        ErrorCode::JiraKeyNotAtEnd,
                        format!("JIRA key '{}' must be at the end of the subject", first),
                    )
                    .with_context("key", *first)
                    .with_context("keys", misplaced.join(","))
                    .with_help("Move the key to the end, e.g. 'feat: add login PROJ-123'"),
                );
            }
        }

        errors.extend(self.check_projects(&keys, policy));
        errors
    }

    fn validate_body(&self, commit: &Commit, policy: &JiraPolicy) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let lines: Vec<&str> = commit.body_lines().collect();
        let first_signoff = lines.iter().position(|l| l.starts_with(SIGNOFF_PREFIX));

        let mut keys: Vec<JiraKey> = Vec::new();
        let mut refs_after_signoff = None;

        for (index, line) in lines.iter().enumerate() {
            if !line.starts_with(REFS_PREFIX) {
                continue;
            }

            if first_signoff.map_or(false, |signoff| index > signoff) && refs_after_signoff.is_none()
            {
                refs_after_signoff = Some(index + 1);
            }

            let tokens = match parse_refs_line(line) {
                Some(tokens) => tokens,
                None => {
                    tracing::trace!("Ignoring malformed Refs line: {}", line);
                    continue;
                }
            };

            for token in tokens {
                if policy.is_ignored(token) {
                    continue;
                }
                if KEY_TOKEN.is_match(token) {
                    keys.push(key_from_token(token));
                } else {
                    errors.push(
                        ValidationError::new(
                            Self::NAME,
                            ErrorCode::InvalidKeyFormat,
                            format!("JIRA key '{}' must use an uppercase project prefix", token),
                        )
                        .with_context("key", token)
                        .with_help(format!("Write it as '{}'", token.to_uppercase())),
                    );
                }
            }
        }

        if keys.is_empty() && errors.is_empty() {
            errors.push(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::MissingJiraKeyBody,
                    "No 'Refs:' line with a JIRA key found in the body",
                )
                .with_help("Add a trailer such as 'Refs: PROJ-123' above the sign-off"),
            );
        }

        if let Some(line) = refs_after_signoff {
            errors.push(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::RefsAfterSignoff,
                    "'Refs:' line appears after 'Signed-off-by'",
                )
                .with_context("line", line)
                .with_help("Move every 'Refs:' line above the first 'Signed-off-by' line"),
            );
        }

        errors.extend(self.check_projects(&keys, policy));
        errors
    }

    fn check_projects(&self, keys: &[JiraKey], policy: &JiraPolicy) -> Vec<ValidationError> {
        let mut seen: Vec<&str> = Vec::new();
        let mut errors = Vec::new();

        for key in keys {
            if seen.contains(&key.key) || policy.allows_project(key.project) {
                continue;
            }
            seen.push(key.key);
            errors.push(
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::InvalidProject,
                    format!("JIRA project '{}' is not allowed", key.project),
                )
                .with_context("key", key.key)
                .with_context("project", key.project)
                .with_context("allowed_projects", policy.project_prefixes.join(","))
                .with_help(format!(
                    "Use a key from one of: {}",
                    policy.project_prefixes.join(", ")
                )),
            );
        }

        errors
    }
}

impl Rule for JiraReferenceRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "jira-reference"
    }

    fn description(&self) -> &'static str {
        "JIRA keys are present, well placed, and belong to allowed projects"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let policy = &config.jira;
        let mut errors = self.validate_subject(commit, policy);
        if policy.require_in_body {
            errors.extend(self.validate_body(commit, policy));
        }
        errors
    }
}

/// Every non-ignored key in `text`, in order.
fn find_keys<'a>(text: &'a str, policy: &JiraPolicy) -> Vec<JiraKey<'a>> {
    JIRA_KEY
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let project = caps.get(1)?;
            Some(JiraKey {
                key: whole.as_str(),
                project: project.as_str(),
                offset: whole.start(),
            })
        })
        .filter(|k| !policy.is_ignored(k.key))
        .collect()
}

fn key_from_token(token: &str) -> JiraKey<'_> {
    let project = token.split('-').next().unwrap_or(token);
    JiraKey {
        key: token,
        project,
        offset: 0,
    }
}

/// Byte offset where the trailing run of key tokens begins, or `text.len()`
/// when the text does not end with a key.
///
/// Keys may be wrapped in brackets or separated by commas: `add x [PROJ-1]`,
/// `add x (PROJ-1, PROJ-2)`.
fn trailing_keys_start(text: &str) -> usize {
    let is_separator = |c: char| c.is_whitespace() || c == ',';
    let mut start = text.len();
    let mut rest = text;

    loop {
        let trimmed = rest.trim_end_matches(is_separator);
        if trimmed.is_empty() {
            return start;
        }

        let token_start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| is_separator(*c))
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);

        let core = trimmed[token_start..]
            .trim_matches(|c: char| matches!(c, '[' | ']' | '(' | ')' | '{' | '}' | '.' | ';' | ':'));

        if !KEY_TOKEN.is_match(core) {
            return start;
        }

        start = token_start;
        rest = &trimmed[..token_start];
    }
}

/// Key tokens of a `Refs: A-1, B-2` line. `None` unless the line has
/// exactly that shape: no indentation, one space after the colon, keys
/// separated by a comma and one space.
fn parse_refs_line(line: &str) -> Option<Vec<&str>> {
    let rest = line.strip_prefix(REFS_PREFIX)?.strip_prefix(' ')?;
    let tokens: Vec<&str> = rest.split(REFS_SEPARATOR).collect();
    if tokens.iter().all(|t| KEY_SHAPE.is_match(t)) {
        Some(tokens)
    } else {
        None
    }
}
