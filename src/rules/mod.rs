// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Commit message rules, the registry that activates them, and the engine
//! that runs them.

mod body;
mod commits_ahead;
mod conventional;
mod engine;
mod imperative;
mod jira;
mod registry;
mod result;
mod rule;
mod signature;
mod signoff;
mod spell;
mod subject;

pub use body::{is_trailer, CommitBodyRule};
pub use commits_ahead::{CommitAnalyzer, CommitsAheadRule};
pub use conventional::ConventionalCommitRule;
pub use engine::{CancellationToken, ValidationEngine};
pub use imperative::{ImperativeExceptions, VerbForm};
pub use jira::JiraReferenceRule;
pub use registry::RuleRegistry;
pub use result::{
    CommitResult, ErrorCode, RuleResult, RuleStatus, ValidationError, ValidationResults,
};
pub use rule::Rule;
pub use signature::{SignatureKind, SignatureRule};
pub use signoff::{parse_signoff, SignOffRule, Signoff};
pub use spell::{prepare_text, Misspelling, MisspellingTable, SpellChecker, SpellRule};
pub use subject::SubjectRule;
