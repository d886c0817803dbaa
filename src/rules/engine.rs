// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Validation engine: runs the registry's rules over commits.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use tracing::{debug, trace};

use crate::commit::Commit;
use crate::config::RuleConfiguration;
use crate::error::{LintError, Result};

use super::registry::RuleRegistry;
use super::result::{CommitResult, RuleResult, ValidationResults};
use super::rule::Rule;

/// Cooperative stop signal shared between the engine and its caller.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the engine to stop. Commits already evaluated are kept.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs every registered rule against commits and aggregates the results.
#[derive(Debug)]
pub struct ValidationEngine {
    registry: RuleRegistry,
    config: Arc<RuleConfiguration>,
    jobs: usize,
    cancellation: CancellationToken,
}

impl ValidationEngine {
    /// Create an engine that evaluates commits one at a time.
    pub fn new(registry: RuleRegistry, config: Arc<RuleConfiguration>) -> Self {
        Self {
            registry,
            config,
            jobs: 1,
            cancellation: CancellationToken::new(),
        }
    }

    /// Evaluate commits on up to `jobs` worker threads.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Stop early once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &RuleConfiguration {
        &self.config
    }

    /// Validate a single commit.
    pub fn validate_commit(&self, commit: &Commit) -> Result<CommitResult> {
        let rules = self.registry.all_rules();
        self.evaluate(&rules, commit)
            .ok_or_else(|| cancelled(ValidationResults::default()))
    }

    /// Validate commits in order. A failing commit never stops the run;
    /// only cancellation does.
    pub fn validate_commits(&self, commits: &[Commit]) -> Result<ValidationResults> {
        let rules = self.registry.all_rules();
        debug!(
            "Validating {} commit(s) against {} active rule(s) with {} job(s)",
            commits.len(),
            rules.iter().filter(|(_, active)| *active).count(),
            self.jobs
        );

        if self.jobs > 1 && commits.len() > 1 {
            self.validate_parallel(&rules, commits)
        } else {
            self.validate_sequential(&rules, commits)
        }
    }

    fn validate_sequential(
        &self,
        rules: &[(Arc<dyn Rule>, bool)],
        commits: &[Commit],
    ) -> Result<ValidationResults> {
        let mut results = ValidationResults::default();
        for commit in commits {
            match self.evaluate(rules, commit) {
                Some(result) => results.add(result),
                None => return Err(cancelled(results)),
            }
        }
        Ok(results)
    }

    /// Workers pull commit indices from a shared counter and send
    /// `(index, result)` to this thread, which puts them back in input order.
    fn validate_parallel(
        &self,
        rules: &[(Arc<dyn Rule>, bool)],
        commits: &[Commit],
    ) -> Result<ValidationResults> {
        let workers = self.jobs.min(commits.len());
        let next = AtomicUsize::new(0);
        let (sender, receiver) = mpsc::channel::<(usize, CommitResult)>();

        let slots = thread::scope(|scope| {
            for worker in 0..workers {
                let sender = sender.clone();
                let next = &next;
                scope.spawn(move || {
                    trace!("Worker {} started", worker);
                    loop {
                        let index = next.fetch_add(1, Ordering::SeqCst);
                        let Some(commit) = commits.get(index) else {
                            break;
                        };
                        let Some(result) = self.evaluate(rules, commit) else {
                            break;
                        };
                        if sender.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(sender);

            let mut slots: Vec<Option<CommitResult>> = (0..commits.len()).map(|_| None).collect();
            for (index, result) in receiver {
                slots[index] = Some(result);
            }
            slots
        });

        let complete = slots.iter().all(Option::is_some);
        let mut results = ValidationResults::default();
        for result in slots.into_iter().flatten() {
            results.add(result);
        }

        if complete {
            Ok(results)
        } else {
            Err(cancelled(results))
        }
    }

    /// Run every rule against one commit. `None` when cancelled midway.
    fn evaluate(&self, rules: &[(Arc<dyn Rule>, bool)], commit: &Commit) -> Option<CommitResult> {
        if self.cancellation.is_cancelled() {
            return None;
        }
        trace!("Validating commit {}", commit.short_hash());

        let mut rule_results = Vec::with_capacity(rules.len());
        for (rule, active) in rules {
            if !active {
                rule_results.push(RuleResult::skipped(rule.as_ref()));
                continue;
            }
            if self.cancellation.is_cancelled() {
                return None;
            }

            let errors = rule.validate(commit, &self.config);
            if !errors.is_empty() {
                trace!("{} reported {} finding(s)", rule.name(), errors.len());
            }
            rule_results.push(RuleResult::evaluated(rule.as_ref(), errors));
        }

        Some(CommitResult::new(commit.clone(), rule_results))
    }
}

fn cancelled(partial: ValidationResults) -> LintError {
    debug!("Validation cancelled after {} commit(s)", partial.total_commits);
    LintError::Cancelled {
        partial: Box::new(partial),
    }
}
