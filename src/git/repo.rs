// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Repository access: reading commits and counting divergence.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, FixedOffset, TimeZone};
use git2::{Oid, Repository as Git2Repo, Sort};
use tracing::{debug, trace};

use crate::commit::Commit;
use crate::error::{GitError, LintError, Result};
use crate::rules::CommitAnalyzer;

/// Source of commits to validate.
pub trait CommitReader {
    /// Read one commit by revision (SHA, branch, `HEAD~2`, ...).
    fn read_commit(&self, reference: &str) -> Result<Commit>;

    /// Read `from..to`, oldest first. A plain revision reads one commit.
    fn read_range(&self, range: &str) -> Result<Vec<Commit>>;
}

/// Wrapper around git2::Repository.
///
/// The handle sits behind a mutex so one repository can serve as the
/// [`CommitAnalyzer`] of rules evaluated on several threads.
pub struct Repository {
    inner: Mutex<Git2Repo>,
    path: PathBuf,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository").field("path", &self.path).finish()
    }
}

impl Repository {
    /// Open a repository from the current directory.
    pub fn open_current() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            LintError::Git(GitError::OpenFailed {
                message: format!("Failed to get current directory: {}", e),
            })
        })?;
        Self::open(&current_dir)
    }

    /// Open the repository containing `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Git2Repo::discover(path).map_err(|e| {
            if e.code() == git2::ErrorCode::NotFound {
                LintError::Git(GitError::NotARepository)
            } else {
                LintError::Git(GitError::OpenFailed {
                    message: e.message().to_string(),
                })
            }
        })?;

        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!("Opened repository at {}", path.display());

        Ok(Self {
            inner: Mutex::new(repo),
            path,
        })
    }

    /// Working directory, or the git directory of a bare repository.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn repo(&self) -> Result<MutexGuard<'_, Git2Repo>> {
        self.inner.lock().map_err(|_| {
            LintError::Git(GitError::CommandFailed {
                command: "lock".to_string(),
                message: "repository handle poisoned".to_string(),
            })
        })
    }

    /// Current branch name, `None` on a detached HEAD.
    ///
    /// An unborn branch (fresh repository) still reports its name.
    pub fn branch_name(&self) -> Result<Option<String>> {
        let repo = self.repo()?;
        let head = match repo.head() {
            Ok(head) => head,
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = repo.find_reference("HEAD").map_err(branch_failed)?;
                return Ok(head
                    .symbolic_target()
                    .map(|target| target.trim_start_matches("refs/heads/").to_string()));
            }
            Err(e) => return Err(branch_failed(e)),
        };

        if !head.is_branch() {
            return Ok(None);
        }
        let name = head.shorthand().ok_or_else(|| {
            LintError::Git(GitError::BranchFailed {
                message: "Invalid branch name encoding".to_string(),
            })
        })?;
        Ok(Some(name.to_string()))
    }

    fn resolve(repo: &Git2Repo, reference: &str) -> Result<Oid> {
        let object = repo.revparse_single(reference).map_err(|e| invalid(reference, e))?;
        let commit = object.peel_to_commit().map_err(|e| invalid(reference, e))?;
        Ok(commit.id())
    }

    fn to_commit(repo: &Git2Repo, commit: &git2::Commit<'_>) -> Commit {
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();
        let author = commit.author();

        let mut result = Commit::from_message(commit.id().to_string(), message)
            .with_author(
                String::from_utf8_lossy(author.name_bytes()),
                String::from_utf8_lossy(author.email_bytes()),
            )
            .with_merge(commit.parent_count() > 1);

        if let Some(date) = commit_date(&commit.time()) {
            result = result.with_date(date);
        }
        if let Ok((signature, _signed_data)) = repo.extract_signature(&commit.id(), None) {
            result = result.with_signature(String::from_utf8_lossy(&signature));
        }
        result
    }
}

impl CommitReader for Repository {
    fn read_commit(&self, reference: &str) -> Result<Commit> {
        let repo = self.repo()?;
        let oid = Self::resolve(&repo, reference)?;
        let commit = repo.find_commit(oid).map_err(|e| invalid(reference, e))?;
        Ok(Self::to_commit(&repo, &commit))
    }

    fn read_range(&self, range: &str) -> Result<Vec<Commit>> {
        let Some((from, to)) = range.split_once("..") else {
            return Ok(vec![self.read_commit(range)?]);
        };
        let to = if to.is_empty() { "HEAD" } else { to };

        let repo = self.repo()?;
        let mut revwalk = repo.revwalk().map_err(|e| command_failed("revwalk", e))?;
        revwalk
            .set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)
            .map_err(|e| command_failed("revwalk.sort", e))?;
        revwalk
            .push(Self::resolve(&repo, to)?)
            .map_err(|e| command_failed("revwalk.push", e))?;
        if !from.is_empty() {
            revwalk
                .hide(Self::resolve(&repo, from)?)
                .map_err(|e| command_failed("revwalk.hide", e))?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(|e| command_failed("revwalk", e))?;
            let commit = repo
                .find_commit(oid)
                .map_err(|e| invalid(&oid.to_string(), e))?;
            commits.push(Self::to_commit(&repo, &commit));
        }
        trace!("Read {} commit(s) from {}", commits.len(), range);

        Ok(commits)
    }
}

impl CommitAnalyzer for Repository {
    fn commits_ahead(&self, reference: &str) -> Result<usize> {
        let repo = self.repo()?;
        let head = Self::resolve(&repo, "HEAD")?;
        let base = Self::resolve(&repo, reference)
            .or_else(|_| Self::resolve(&repo, &format!("origin/{}", reference)))?;

        let (ahead, _behind) = repo
            .graph_ahead_behind(head, base)
            .map_err(|e| command_failed("graph_ahead_behind", e))?;
        debug!("HEAD is {} commit(s) ahead of {}", ahead, reference);
        Ok(ahead)
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.branch_name()
    }
}

/// Commit timestamp in the committer's own offset.
fn commit_date(time: &git2::Time) -> Option<DateTime<FixedOffset>> {
    FixedOffset::east_opt(time.offset_minutes() * 60)?
        .timestamp_opt(time.seconds(), 0)
        .single()
}

fn invalid(reference: &str, e: git2::Error) -> LintError {
    LintError::Git(GitError::InvalidReference {
        reference: format!("{}: {}", reference, e.message()),
    })
}

fn command_failed(command: &str, e: git2::Error) -> LintError {
    LintError::Git(GitError::CommandFailed {
        command: command.to_string(),
        message: e.message().to_string(),
    })
}

fn branch_failed(e: git2::Error) -> LintError {
    LintError::Git(GitError::BranchFailed {
        message: e.message().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{RepositoryInitOptions, Signature};
    use tempfile::TempDir;

    fn init() -> (TempDir, Git2Repo) {
        let dir = TempDir::new().unwrap();
        let mut options = RepositoryInitOptions::new();
        options.initial_head("main");
        let repo = Git2Repo::init_opts(dir.path(), &options).unwrap();
        (dir, repo)
    }

    fn commit(repo: &Git2Repo, message: &str) -> Oid {
        let sig = Signature::now("Dev", "dev@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap()
    }

    #[test]
    fn test_not_a_repo() {
        let dir = TempDir::new().unwrap();
        let result = Repository::open(dir.path());
        assert!(matches!(
            result,
            Err(LintError::Git(GitError::NotARepository))
        ));
    }

    #[test]
    fn test_read_commit() {
        let (dir, git) = init();
        commit(&git, "feat: add login\n\nLonger explanation\n");

        let repo = Repository::open(dir.path()).unwrap();
        let commit = repo.read_commit("HEAD").unwrap();
        assert_eq!(commit.subject, "feat: add login");
        assert_eq!(commit.body, "Longer explanation");
        assert_eq!(commit.author, "Dev");
        assert_eq!(commit.author_email, "dev@example.com");
        assert_eq!(commit.hash.len(), 40);
        assert!(commit.commit_date.is_some());
        assert!(!commit.is_merge_commit);
        assert!(commit.signature.is_none());
    }

    #[test]
    fn test_read_range_oldest_first() {
        let (dir, git) = init();
        let base = commit(&git, "chore: init");
        commit(&git, "feat: one");
        commit(&git, "feat: two");

        let repo = Repository::open(dir.path()).unwrap();
        let commits = repo.read_range(&format!("{}..HEAD", base)).unwrap();
        let subjects: Vec<&str> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["feat: one", "feat: two"]);

        let open_ended = repo.read_range(&format!("{}..", base)).unwrap();
        assert_eq!(open_ended.len(), 2);

        let single = repo.read_range("HEAD").unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].subject, "feat: two");
    }

    #[test]
    fn test_invalid_reference() {
        let (dir, git) = init();
        commit(&git, "chore: init");

        let repo = Repository::open(dir.path()).unwrap();
        assert!(matches!(
            repo.read_commit("does-not-exist"),
            Err(LintError::Git(GitError::InvalidReference { .. }))
        ));
    }

    #[test]
    fn test_branch_name() {
        let (dir, git) = init();
        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(repo.branch_name().unwrap().as_deref(), Some("main"));

        let oid = commit(&git, "chore: init");
        assert_eq!(repo.current_branch().unwrap().as_deref(), Some("main"));

        git.set_head_detached(oid).unwrap();
        assert_eq!(repo.branch_name().unwrap(), None);
    }

    #[test]
    fn test_commits_ahead() {
        let (dir, git) = init();
        let base = commit(&git, "chore: init");
        git.branch("base", &git.find_commit(base).unwrap(), false)
            .unwrap();
        git.reference("refs/remotes/origin/upstream", base, false, "test")
            .unwrap();
        commit(&git, "feat: one");
        commit(&git, "feat: two");
        commit(&git, "feat: three");

        let repo = Repository::open(dir.path()).unwrap();
        assert_eq!(repo.commits_ahead("base").unwrap(), 3);
        assert_eq!(repo.commits_ahead("upstream").unwrap(), 3);
        assert_eq!(repo.commits_ahead("main").unwrap(), 0);
        assert!(repo.commits_ahead("missing").is_err());
    }
}
