// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! The compiled policy snapshot handed to every rule.
//!
//! [`LintConfig`] is what users write; [`RuleConfiguration`] is what rules
//! read. Conversion compiles every pattern once so that rules never deal
//! with malformed configuration at evaluation time.

use std::collections::HashSet;

use glob::Pattern;
use regex::Regex;

use crate::error::{ConfigError, LintError, Result};
use crate::rules::ImperativeExceptions;

use super::default::DEFAULT_DISABLED_RULES;
use super::schema::{LintConfig, SubjectCase};

/// Immutable policy snapshot shared by all rules of a run.
#[derive(Debug, Clone)]
pub struct RuleConfiguration {
    pub subject: SubjectPolicy,
    pub body: BodyPolicy,
    pub conventional: ConventionalPolicy,
    pub jira: JiraPolicy,
    pub signing: SigningPolicy,
    pub spell: SpellPolicy,
    pub repo: RepoPolicy,
    /// Rule names or ids to run; empty runs all.
    pub enabled_rules: Vec<String>,
    /// Rule names or ids to skip, as configured.
    pub disabled_rules: Vec<String>,
}

impl RuleConfiguration {
    /// The configured disable list plus the built-in default-off rules.
    /// Pass it to `RuleRegistry::apply_policy` together with `enabled_rules`
    /// so that naming a rule in `enabled` still turns it on.
    pub fn effective_disabled_rules(&self) -> Vec<String> {
        DEFAULT_DISABLED_RULES
            .iter()
            .map(|name| name.to_string())
            .chain(self.disabled_rules.iter().cloned())
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct SubjectPolicy {
    pub max_length: usize,
    pub case: SubjectCase,
    pub forbid_endings: Vec<String>,
    pub require_imperative: bool,
    pub imperative: ImperativeExceptions,
}

#[derive(Debug, Clone)]
pub struct BodyPolicy {
    pub required: bool,
    pub min_length: usize,
    pub min_signoff_count: usize,
}

#[derive(Debug, Clone)]
pub struct ConventionalPolicy {
    pub types: Vec<String>,
    /// Anchored scope patterns.
    pub scopes: Vec<Regex>,
    pub max_description_length: usize,
}

impl ConventionalPolicy {
    /// Whether a commit type is accepted. `feat` and `fix` always are.
    pub fn allows_type(&self, commit_type: &str) -> bool {
        commit_type == "feat" || commit_type == "fix" || self.types.iter().any(|t| t == commit_type)
    }

    /// Whether a single scope token matches at least one pattern.
    pub fn allows_scope(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|re| re.is_match(scope))
    }
}

#[derive(Debug, Clone)]
pub struct JiraPolicy {
    pub project_prefixes: Vec<String>,
    pub require_in_subject: bool,
    pub require_in_body: bool,
    pub ignore_patterns: Vec<Regex>,
}

impl JiraPolicy {
    /// Whether a key is suppressed by an ignore pattern.
    pub fn is_ignored(&self, key: &str) -> bool {
        self.ignore_patterns.iter().any(|re| re.is_match(key))
    }

    /// Whether a project prefix is accepted.
    pub fn allows_project(&self, project: &str) -> bool {
        self.project_prefixes.is_empty() || self.project_prefixes.iter().any(|p| p == project)
    }
}

#[derive(Debug, Clone)]
pub struct SigningPolicy {
    pub allowed_types: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SpellPolicy {
    pub locale: String,
    /// Lowercased.
    pub ignore_words: HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct RepoPolicy {
    pub reference_branch: String,
    pub max_commits_ahead: usize,
    pub ignore_branches: Vec<Pattern>,
    pub enforce_branches: Vec<Pattern>,
}

impl RuleConfiguration {
    fn from_parts(
        config: &LintConfig,
        scopes: Vec<Regex>,
        ignore_patterns: Vec<Regex>,
        ignore_branches: Vec<Pattern>,
        enforce_branches: Vec<Pattern>,
    ) -> Self {
        let subject = &config.message.subject;

        Self {
            subject: SubjectPolicy {
                max_length: subject.max_length,
                case: subject.case,
                forbid_endings: subject.forbid_endings.clone(),
                require_imperative: subject.require_imperative,
                imperative: ImperativeExceptions::default()
                    .with_base_forms(subject.imperative_exceptions.iter().map(String::as_str))
                    .with_irregular_third_person(
                        subject.irregular_third_person.iter().map(String::as_str),
                    ),
            },
            body: BodyPolicy {
                required: config.message.body.required,
                min_length: config.message.body.min_length,
                min_signoff_count: config.message.body.min_signoff_count,
            },
            conventional: ConventionalPolicy {
                types: config.conventional.types.clone(),
                scopes,
                max_description_length: config.conventional.max_description_length,
            },
            jira: JiraPolicy {
                project_prefixes: config.jira.project_prefixes.clone(),
                require_in_subject: config.jira.require_in_subject,
                require_in_body: config.jira.require_in_body,
                ignore_patterns,
            },
            signing: SigningPolicy {
                allowed_types: config
                    .signing
                    .allowed_types
                    .iter()
                    .map(|t| t.to_lowercase())
                    .collect(),
            },
            spell: SpellPolicy {
                locale: config.spell.locale.to_uppercase(),
                ignore_words: config
                    .spell
                    .ignore_words
                    .iter()
                    .map(|w| w.to_lowercase())
                    .collect(),
            },
            repo: RepoPolicy {
                reference_branch: config.repo.reference_branch.trim().to_string(),
                max_commits_ahead: config.repo.max_commits_ahead,
                ignore_branches,
                enforce_branches,
            },
            enabled_rules: config.rules.enabled.clone(),
            disabled_rules: config.rules.disabled.clone(),
        }
    }
}

impl Default for RuleConfiguration {
    fn default() -> Self {
        Self::from_parts(
            &LintConfig::default(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }
}

impl TryFrom<&LintConfig> for RuleConfiguration {
    type Error = LintError;

    fn try_from(config: &LintConfig) -> Result<Self> {
        let scopes = compile_regexes("conventional.scopes", &config.conventional.scopes, true)?;
        let ignore_patterns = compile_regexes(
            "jira.ignore_ticket_patterns",
            &config.jira.ignore_ticket_patterns,
            false,
        )?;
        let ignore_branches = compile_globs("repo.ignore_branches", &config.repo.ignore_branches)?;
        let enforce_branches =
            compile_globs("repo.enforce_branches", &config.repo.enforce_branches)?;

        match config.spell.locale.to_uppercase().as_str() {
            "US" | "UK" => {}
            other => {
                return Err(invalid("spell.locale", format!("unsupported locale '{}'", other)));
            }
        }

        Ok(Self::from_parts(
            config,
            scopes,
            ignore_patterns,
            ignore_branches,
            enforce_branches,
        ))
    }
}

fn compile_regexes(key: &str, patterns: &[String], anchored: bool) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            let source = if anchored {
                format!("^(?:{})$", pattern)
            } else {
                pattern.clone()
            };
            Regex::new(&source).map_err(|e| invalid(key, format!("'{}': {}", pattern, e)))
        })
        .collect()
}

fn compile_globs(key: &str, patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|e| invalid(key, format!("'{}': {}", pattern, e)))
        })
        .collect()
}

fn invalid(key: &str, message: String) -> LintError {
    LintError::Config(ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_default_snapshot() {
        let config = RuleConfiguration::default();
        assert_eq!(config.conventional.max_description_length, 72);
        assert!(config.conventional.allows_type("docs"));
        assert!(config.conventional.allows_scope("anything"));
        assert!(config.jira.allows_project("ANY"));
    }

    #[test]
    fn test_feat_and_fix_always_allowed() {
        let mut lint = LintConfig::default();
        lint.conventional.types = vec!["docs".to_string()];
        let config = RuleConfiguration::try_from(&lint).unwrap();

        assert!(config.conventional.allows_type("feat"));
        assert!(config.conventional.allows_type("fix"));
        assert!(config.conventional.allows_type("docs"));
        assert!(!config.conventional.allows_type("chore"));
    }

    #[test]
    fn test_scope_patterns_are_anchored() {
        let lint = parse_config("[conventional]\nscopes = [\"api\", \"deps(-dev)?\"]").unwrap();
        let config = RuleConfiguration::try_from(&lint).unwrap();

        assert!(config.conventional.allows_scope("api"));
        assert!(config.conventional.allows_scope("deps-dev"));
        assert!(!config.conventional.allows_scope("rapid"));
    }

    #[test]
    fn test_configured_disable_list_extends_defaults() {
        let lint = parse_config("[rules]\ndisabled = [\"Subject\"]").unwrap();
        let config = RuleConfiguration::try_from(&lint).unwrap();
        let disabled = config.effective_disabled_rules();

        assert!(disabled.contains(&"Subject".to_string()));
        for name in DEFAULT_DISABLED_RULES {
            assert!(disabled.contains(&name.to_string()), "{name}");
        }
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let lint = parse_config("[jira]\nignore_ticket_patterns = [\"(unclosed\"]").unwrap();
        let err = RuleConfiguration::try_from(&lint).unwrap_err();
        assert!(err.to_string().contains("jira.ignore_ticket_patterns"));
    }

    #[test]
    fn test_invalid_locale_is_rejected() {
        let lint = parse_config("[spell]\nlocale = \"FR\"").unwrap();
        assert!(RuleConfiguration::try_from(&lint).is_err());
    }

    #[test]
    fn test_imperative_exceptions_extend_defaults() {
        let lint =
            parse_config("[message.subject]\nimperative_exceptions = [\"unshred\"]").unwrap();
        let config = RuleConfiguration::try_from(&lint).unwrap();
        assert!(config.subject.imperative.is_base_form("unshred"));
        assert!(config.subject.imperative.is_base_form("embed"));
    }

    #[test]
    fn test_irregular_third_person_from_config() {
        let lint =
            parse_config("[message.subject]\nirregular_third_person = [\"was\"]").unwrap();
        let config = RuleConfiguration::try_from(&lint).unwrap();
        assert_eq!(
            config.subject.imperative.classify("Was"),
            crate::rules::VerbForm::ThirdPerson
        );
    }
}
