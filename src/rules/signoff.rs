// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Strict DCO sign-off rule.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::commit::Commit;
use crate::config::RuleConfiguration;

use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

lazy_static! {
    /// `Signed-off-by: Name <email>`, exactly.
    static ref DCO_SIGNOFF: Regex = Regex::new(
        r"^Signed-off-by: (?P<name>[^<>]+) <(?P<email>[^<>\s@]+@[^<>\s]+)>$"
    ).unwrap();
}

/// A sign-off trailer that passed the strict format check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signoff {
    pub name: String,
    pub email: String,
}

/// Parse one line as a strict sign-off. Trailing whitespace is tolerated;
/// anything else off the exact format is rejected.
pub fn parse_signoff(line: &str) -> Option<Signoff> {
    let captures = DCO_SIGNOFF.captures(line.trim_end())?;
    let name = captures.name("name")?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    Some(Signoff {
        name: name.to_string(),
        email: captures.name("email")?.as_str().to_string(),
    })
}

fn looks_like_signoff(line: &str) -> bool {
    line.trim_start()
        .to_ascii_lowercase()
        .starts_with("signed-off-by")
}

/// Checks `Signed-off-by` trailers: format, count, distinct signers,
/// placement.
#[derive(Debug, Default, Clone, Copy)]
pub struct SignOffRule;

impl SignOffRule {
    const NAME: &'static str = "SignOff";
}

impl Rule for SignOffRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "sign-off"
    }

    fn description(&self) -> &'static str {
        "Message ends with enough strictly formatted Signed-off-by trailers"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let min = config.body.min_signoff_count;
        let lines: Vec<&str> = commit.body_lines().collect();

        let mut signoffs: Vec<(usize, Signoff)> = Vec::new();
        let mut malformed = 0;
        for (index, line) in lines.iter().enumerate() {
            match parse_signoff(line) {
                Some(signoff) => signoffs.push((index, signoff)),
                None if looks_like_signoff(line) => malformed += 1,
                None => {}
            }
        }

        let mut errors = Vec::new();

        let raw = signoffs.len();
        let counted = if min > 1 {
            signoffs
                .iter()
                .map(|(_, s)| s)
                .collect::<HashSet<_>>()
                .len()
        } else {
            raw
        };

        if counted < min {
            if min > 1 && raw >= min {
                errors.push(
                    ValidationError::new(
                        Self::NAME,
                        ErrorCode::InsufficientSignoffs,
                        format!(
                            "Found {} distinct signer(s), {} required; repeated sign-offs count once",
                            counted, min
                        ),
                    )
                    .with_context("actual", counted)
                    .with_context("expected", min)
                    .with_context("duplicates", raw - counted)
                    .with_help("Each sign-off must come from a different name and email"),
                );
            } else {
                let mut error = ValidationError::new(
                    Self::NAME,
                    ErrorCode::MissingSignoff,
                    format!("Found {} valid sign-off(s), {} required", counted, min),
                )
                .with_context("actual", counted)
                .with_context("expected", min)
                .with_help("Add 'Signed-off-by: Your Name <you@example.com>' (git commit -s)");
                if malformed > 0 {
                    error = error.with_context("malformed", malformed);
                }
                errors.push(error);
            }
        }

        if let (Some((first, _)), Some((last, _))) = (signoffs.first(), signoffs.last()) {
            let signoff_lines: HashSet<usize> = signoffs.iter().map(|(i, _)| *i).collect();
            let stray = lines
                .iter()
                .enumerate()
                .skip(*first)
                .find(|(i, line)| !signoff_lines.contains(i) && !line.trim().is_empty());

            if let Some((index, line)) = stray {
                let message = if index > *last {
                    "Content found after the last Signed-off-by line"
                } else {
                    "Signed-off-by lines are not contiguous"
                };
                errors.push(
                    ValidationError::new(Self::NAME, ErrorCode::MisplacedSignoff, message)
                        .with_context("line", line.trim())
                        .with_help("Keep all Signed-off-by lines together at the very end"),
                );
            }
        }

        errors
    }
}
