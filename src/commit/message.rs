// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Conventional commit header parsing.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Loose conventional header grammar.
    ///
    /// Spaces after the colon are captured rather than enforced so callers
    /// can tell a malformed header apart from a spacing mistake. Tabs are
    /// never spacing; they belong to the description.
    static ref CONVENTIONAL_HEADER: Regex = Regex::new(
        r"^(?P<type>[A-Za-z][\w-]*)(?:\((?P<scope>[^()\r\n]*)\))?(?P<breaking>!)?:(?P<spacing> *)(?P<description>.*)$"
    ).unwrap();
}

/// The parts of a `type(scope)!: description` subject line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConventionalHeader<'a> {
    /// Commit type, as written.
    pub commit_type: &'a str,
    /// Raw scope text between the parentheses.
    pub scope: Option<&'a str>,
    /// Whether `!` precedes the colon.
    pub is_breaking: bool,
    /// Spaces between the colon and the description.
    pub spacing: &'a str,
    /// Everything after the spacing.
    pub description: &'a str,
    /// Byte offset of the description within the subject.
    pub description_offset: usize,
}

impl<'a> ConventionalHeader<'a> {
    /// Parse a subject line. Returns `None` when the line is not shaped like
    /// a conventional header at all.
    pub fn parse(subject: &'a str) -> Option<Self> {
        let captures = CONVENTIONAL_HEADER.captures(subject)?;

        let commit_type = captures.name("type")?.as_str();
        let scope = captures.name("scope").map(|m| m.as_str());
        let description = captures.name("description")?;

        Some(Self {
            commit_type,
            scope,
            is_breaking: captures.name("breaking").is_some(),
            spacing: captures.name("spacing").map(|m| m.as_str()).unwrap_or(""),
            description: description.as_str(),
            description_offset: description.start(),
        })
    }

    /// Comma-separated scope tokens, trimmed. Empty tokens are kept so that
    /// `feat(a,)` can be rejected.
    pub fn scopes(&self) -> Vec<&'a str> {
        match self.scope {
            Some(scope) => scope.split(',').map(str::trim).collect(),
            None => Vec::new(),
        }
    }

    /// Exactly one space separates the colon from the description.
    pub fn has_single_space(&self) -> bool {
        self.spacing == " "
    }
}

/// Whether a subject parses as a conventional header.
pub fn is_conventional(subject: &str) -> bool {
    ConventionalHeader::parse(subject).is_some()
}

/// The part of the subject that carries prose: the description for
/// conventional subjects, the whole line otherwise.
pub fn subject_text(subject: &str) -> &str {
    match ConventionalHeader::parse(subject) {
        Some(header) => header.description.trim_start(),
        None => subject.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let header = ConventionalHeader::parse("feat: add new feature").unwrap();
        assert_eq!(header.commit_type, "feat");
        assert_eq!(header.scope, None);
        assert!(!header.is_breaking);
        assert!(header.has_single_space());
        assert_eq!(header.description, "add new feature");
        assert_eq!(header.description_offset, 6);
    }

    #[test]
    fn test_parse_scope_and_breaking() {
        let header = ConventionalHeader::parse("fix(api,core)!: drop v1").unwrap();
        assert_eq!(header.scope, Some("api,core"));
        assert_eq!(header.scopes(), vec!["api", "core"]);
        assert!(header.is_breaking);
    }

    #[test]
    fn test_breaking_marker_before_scope_is_rejected() {
        assert!(ConventionalHeader::parse("feat!(api): nope").is_none());
    }

    #[test]
    fn test_spacing_is_captured() {
        let header = ConventionalHeader::parse("feat:  two spaces").unwrap();
        assert_eq!(header.spacing, "  ");
        assert!(!header.has_single_space());

        let header = ConventionalHeader::parse("feat:none").unwrap();
        assert_eq!(header.spacing, "");

        let header = ConventionalHeader::parse("feat: \tx").unwrap();
        assert_eq!(header.spacing, " ");
        assert_eq!(header.description, "\tx");
    }

    #[test]
    fn test_not_conventional() {
        assert!(!is_conventional("Add a thing"));
        assert!(!is_conventional(": missing type"));
    }

    #[test]
    fn test_subject_text() {
        assert_eq!(subject_text("feat(ui): Add button"), "Add button");
        assert_eq!(subject_text("  Plain subject "), "Plain subject");
    }
}
