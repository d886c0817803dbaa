// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The normalized commit every rule reads.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Scissors line git inserts into `COMMIT_EDITMSG` in verbose mode.
const SCISSORS: &str = "# ------------------------ >8 ------------------------";

/// A commit as seen by the rules.
///
/// Rules only ever receive `&Commit`; construction happens once, in the git
/// collaborator or from a message file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Commit {
    /// Full object id (empty for messages that are not yet committed).
    pub hash: String,
    /// First non-blank line of the message.
    pub subject: String,
    /// Everything after the subject, with the blank separator removed.
    pub body: String,
    /// Raw message text.
    pub message: String,
    /// Author name.
    pub author: String,
    /// Author email.
    pub author_email: String,
    /// Commit timestamp in the author's offset.
    pub commit_date: Option<DateTime<FixedOffset>>,
    /// Whether the commit has more than one parent.
    pub is_merge_commit: bool,
    /// Armored signature block, when the commit is signed.
    #[serde(skip_serializing)]
    pub signature: Option<String>,
}

impl Commit {
    /// Build a commit from its hash and raw message.
    pub fn from_message(hash: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let (subject, body) = split_message(&message);

        Self {
            hash: hash.into(),
            subject,
            body,
            message,
            ..Self::default()
        }
    }

    /// Build an uncommitted commit from a `COMMIT_EDITMSG` style file.
    ///
    /// Applies git's default cleanup: comment lines go, and so does
    /// everything below the scissors line.
    pub fn from_edit_message(text: &str) -> Self {
        let mut kept = Vec::new();
        for line in text.lines() {
            if line == SCISSORS {
                break;
            }
            if line.starts_with('#') {
                continue;
            }
            kept.push(line);
        }

        Self::from_message("", kept.join("\n").trim_end().to_string())
    }

    /// Set the author.
    pub fn with_author(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.author = name.into();
        self.author_email = email.into();
        self
    }

    /// Set the commit date.
    pub fn with_date(mut self, date: DateTime<FixedOffset>) -> Self {
        self.commit_date = Some(date);
        self
    }

    /// Mark as a merge commit.
    pub fn with_merge(mut self, is_merge: bool) -> Self {
        self.is_merge_commit = is_merge;
        self
    }

    /// Attach the raw signature block.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        let signature = signature.into();
        if !signature.trim().is_empty() {
            self.signature = Some(signature);
        }
        self
    }

    /// Abbreviated hash for display.
    pub fn short_hash(&self) -> &str {
        match self.hash.char_indices().nth(7) {
            Some((end, _)) => &self.hash[..end],
            None => &self.hash,
        }
    }

    /// Body split into lines.
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        self.body.lines()
    }
}

/// Split a raw message into subject and body.
///
/// Leading blank lines (left behind by squash-merge tooling) are skipped
/// before the subject is taken.
fn split_message(message: &str) -> (String, String) {
    let mut lines = message.lines().skip_while(|line| line.trim().is_empty());

    let subject = lines.next().unwrap_or("").to_string();

    let body = lines
        .skip_while(|line| line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string();

    (subject, body)
}
