// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Limit on how far the current branch may run ahead of a reference branch.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::commit::Commit;
use crate::config::RuleConfiguration;
use crate::error::Result;

use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

/// Repository queries the branch rule needs.
pub trait CommitAnalyzer: Send + Sync {
    /// Number of commits reachable from HEAD but not from `reference`.
    fn commits_ahead(&self, reference: &str) -> Result<usize>;

    /// Current branch name, `None` on a detached HEAD.
    fn current_branch(&self) -> Result<Option<String>>;
}

/// Fails when HEAD is more than `repo.max_commits_ahead` commits ahead of
/// `repo.reference_branch`.
///
/// The result is the same for every commit of a run; the analyzer is asked
/// once per commit evaluated.
#[derive(Clone, Default)]
pub struct CommitsAheadRule {
    analyzer: Option<Arc<dyn CommitAnalyzer>>,
}

impl fmt::Debug for CommitsAheadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommitsAheadRule")
            .field("analyzer", &self.analyzer.is_some())
            .finish()
    }
}

impl CommitsAheadRule {
    const NAME: &'static str = "CommitsAhead";

    pub fn new(analyzer: Option<Arc<dyn CommitAnalyzer>>) -> Self {
        Self { analyzer }
    }

    fn configuration_error(message: impl Into<String>) -> ValidationError {
        ValidationError::new(Self::NAME, ErrorCode::ConfigurationError, message)
            .with_help("Run inside a git repository and set repo.reference_branch")
    }

    fn git_error(error: impl fmt::Display) -> ValidationError {
        ValidationError::new(
            Self::NAME,
            ErrorCode::GitOperationFailed,
            format!("Git operation failed: {}", error),
        )
        .with_context("error", error)
    }

    /// Whether the branch filters exempt `branch`.
    fn is_exempt(config: &RuleConfiguration, branch: Option<&str>) -> bool {
        let repo = &config.repo;
        let Some(branch) = branch else {
            return !repo.enforce_branches.is_empty();
        };
        if repo.ignore_branches.iter().any(|p| p.matches(branch)) {
            return true;
        }
        !repo.enforce_branches.is_empty() && !repo.enforce_branches.iter().any(|p| p.matches(branch))
    }
}

impl Rule for CommitsAheadRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "commits-ahead"
    }

    fn description(&self) -> &'static str {
        "Branch is at most N commits ahead of the reference branch"
    }

    fn validate(&self, _commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let Some(analyzer) = &self.analyzer else {
            return vec![Self::configuration_error("No repository available to count commits")];
        };

        let repo = &config.repo;
        if repo.reference_branch.is_empty() {
            return vec![Self::configuration_error("repo.reference_branch is empty")];
        }

        let branch = match analyzer.current_branch() {
            Ok(branch) => branch,
            Err(e) => return vec![Self::git_error(e)],
        };
        if Self::is_exempt(config, branch.as_deref()) {
            debug!("Branch {:?} is exempt from the commits-ahead limit", branch);
            return Vec::new();
        }

        let ahead = match analyzer.commits_ahead(&repo.reference_branch) {
            Ok(ahead) => ahead,
            Err(e) => return vec![Self::git_error(e)],
        };
        if ahead <= repo.max_commits_ahead {
            return Vec::new();
        }

        vec![ValidationError::new(
            Self::NAME,
            ErrorCode::TooManyCommits,
            format!(
                "Branch is {} commits ahead of '{}' (max: {})",
                ahead, repo.reference_branch, repo.max_commits_ahead
            ),
        )
        .with_context("actual", ahead)
        .with_context("maximum", repo.max_commits_ahead)
        .with_context("reference", &repo.reference_branch)
        .with_help("Squash or split the branch into smaller pull requests")]
    }
}
