// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Named rule set with per-run activation.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::body::CommitBodyRule;
use super::commits_ahead::{CommitAnalyzer, CommitsAheadRule};
use super::conventional::ConventionalCommitRule;
use super::jira::JiraReferenceRule;
use super::rule::Rule;
use super::signature::SignatureRule;
use super::signoff::SignOffRule;
use super::spell::{SpellChecker, SpellRule};
use super::subject::SubjectRule;

#[derive(Debug, Clone)]
struct Entry {
    rule: Arc<dyn Rule>,
    active: bool,
}

/// Rules keyed by name. Every listing is sorted by name.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<&'static str, Entry>,
}

impl RuleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in rule, all active.
    pub fn with_defaults(
        analyzer: Option<Arc<dyn CommitAnalyzer>>,
        spell_checker: Option<Arc<dyn SpellChecker>>,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ConventionalCommitRule));
        registry.register(Arc::new(JiraReferenceRule));
        registry.register(Arc::new(SignOffRule));
        registry.register(Arc::new(SubjectRule));
        registry.register(Arc::new(CommitBodyRule));
        registry.register(Arc::new(SignatureRule));
        registry.register(Arc::new(SpellRule::new(spell_checker)));
        registry.register(Arc::new(CommitsAheadRule::new(analyzer)));
        registry
    }

    /// Add a rule, active. A rule with the same name is replaced.
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        trace!("Registering rule {}", rule.name());
        self.rules.insert(rule.name(), Entry { rule, active: true });
    }

    /// Activate exactly the named rules. An empty list activates all.
    /// Unknown names are ignored.
    pub fn set_active_rules<S: AsRef<str>>(&mut self, names: &[S]) {
        for entry in self.rules.values_mut() {
            entry.active = names.is_empty() || names.iter().any(|n| entry.rule.matches(n.as_ref()));
        }
        warn_unknown(self, names);
    }

    /// Deactivate the named rules, leaving the rest untouched.
    pub fn disable_rules<S: AsRef<str>>(&mut self, names: &[S]) {
        for entry in self.rules.values_mut() {
            if names.iter().any(|n| entry.rule.matches(n.as_ref())) {
                entry.active = false;
            }
        }
        warn_unknown(self, names);
    }

    /// Apply an enable list, then a disable list. A rule named in both
    /// stays active.
    pub fn apply_policy<S: AsRef<str>>(&mut self, enabled: &[S], disabled: &[S]) {
        self.set_active_rules(enabled);

        let disabled: Vec<&str> = disabled
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| {
                !enabled.iter().any(|e| {
                    self.get(e.as_ref())
                        .is_some_and(|rule| rule.matches(name))
                })
            })
            .collect();
        self.disable_rules(&disabled);

        debug!(
            "Active rules: {:?}",
            self.active_rules().iter().map(|r| r.name()).collect::<Vec<_>>()
        );
    }

    /// Look up a rule by name or id.
    pub fn get(&self, key: &str) -> Option<Arc<dyn Rule>> {
        self.rules
            .values()
            .find(|entry| entry.rule.matches(key))
            .map(|entry| entry.rule.clone())
    }

    /// Whether the rule named `key` is active.
    pub fn is_active(&self, key: &str) -> bool {
        self.rules
            .values()
            .any(|entry| entry.active && entry.rule.matches(key))
    }

    /// Active rules, sorted by name.
    pub fn active_rules(&self) -> Vec<Arc<dyn Rule>> {
        self.sorted()
            .filter(|entry| entry.active)
            .map(|entry| entry.rule.clone())
            .collect()
    }

    /// Every rule with its activation flag, sorted by name.
    pub fn all_rules(&self) -> Vec<(Arc<dyn Rule>, bool)> {
        self.sorted()
            .map(|entry| (entry.rule.clone(), entry.active))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn sorted(&self) -> impl Iterator<Item = &Entry> {
        let mut entries: Vec<(&&'static str, &Entry)> = self.rules.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter().map(|(_, entry)| entry)
    }
}

fn warn_unknown<S: AsRef<str>>(registry: &RuleRegistry, names: &[S]) {
    for name in names {
        if registry.get(name.as_ref()).is_none() {
            warn!("Ignoring unknown rule '{}'", name.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[Arc<dyn Rule>]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::with_defaults(None, None)
    }

    const NONE: &[&str] = &[];

    #[test]
    fn test_defaults_all_active_and_sorted() {
        let registry = registry();
        assert_eq!(registry.len(), 8);
        assert_eq!(
            names(&registry.active_rules()),
            vec![
                "CommitBody",
                "CommitsAhead",
                "ConventionalCommit",
                "JiraReference",
                "SignOff",
                "Signature",
                "Spell",
                "Subject",
            ]
        );
    }

    #[test]
    fn test_set_active_rules() {
        let mut registry = registry();
        registry.set_active_rules(&["Subject", "conventional-commit", "Unknown"]);
        assert_eq!(
            names(&registry.active_rules()),
            vec!["ConventionalCommit", "Subject"]
        );

        registry.set_active_rules(NONE);
        assert_eq!(registry.active_rules().len(), 8);
    }

    #[test]
    fn test_disable_rules() {
        let mut registry = registry();
        registry.disable_rules(&["spell", "Signature"]);
        assert!(!registry.is_active("Spell"));
        assert!(!registry.is_active("signature"));
        assert!(registry.is_active("Subject"));
        assert_eq!(registry.active_rules().len(), 6);
    }

    #[test]
    fn test_set_active_rules_overrides_earlier_disables() {
        let mut registry = registry();
        registry.disable_rules(&["ConventionalCommit", "Subject"]);
        registry.set_active_rules(&["ConventionalCommit"]);
        assert_eq!(names(&registry.active_rules()), vec!["ConventionalCommit"]);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = registry();
        registry.disable_rules(&["Subject"]);
        registry.register(Arc::new(SubjectRule));
        assert_eq!(registry.len(), 8);
        assert!(registry.is_active("Subject"));
    }

    #[test]
    fn test_apply_policy_enabled_wins() {
        let mut registry = registry();
        registry.apply_policy(&["Spell"], &["spell", "Subject"]);
        assert_eq!(names(&registry.active_rules()), vec!["Spell"]);

        let mut registry = self::registry();
        registry.apply_policy(NONE, &["Spell", "CommitsAhead"]);
        assert!(!registry.is_active("Spell"));
        assert!(!registry.is_active("CommitsAhead"));
        assert!(registry.is_active("JiraReference"));
    }
}
