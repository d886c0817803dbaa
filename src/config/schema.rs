// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration schema definitions.
//!
//! Defines all configuration structures that can be loaded from msglint.toml.

use serde::{Deserialize, Serialize};

/// The main configuration structure for msglint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LintConfig {
    /// Subject and body policy.
    pub message: MessageConfig,

    /// Conventional commit grammar policy.
    pub conventional: ConventionalConfig,

    /// JIRA reference policy.
    pub jira: JiraConfig,

    /// Commit signature policy.
    pub signing: SigningConfig,

    /// Spell checking policy.
    pub spell: SpellConfig,

    /// Branch and ahead-count policy.
    pub repo: RepoConfig,

    /// Rule activation.
    pub rules: RulesConfig,

    /// Report output.
    pub output: OutputConfig,
}

impl LintConfig {
    /// Load configuration from the default locations.
    pub fn load() -> crate::error::Result<Self> {
        super::loader::load_config()
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &std::path::Path) -> crate::error::Result<Self> {
        super::loader::load_config_from(path)
    }
}

/// Message configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MessageConfig {
    /// Subject line policy.
    pub subject: SubjectConfig,

    /// Body policy.
    pub body: BodyConfig,
}

/// Subject line configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubjectConfig {
    /// Maximum length of the subject line, in characters.
    pub max_length: usize,

    /// Required case of the first letter.
    pub case: SubjectCase,

    /// Endings the subject must not have.
    pub forbid_endings: Vec<String>,

    /// Whether the first word must be an imperative verb.
    pub require_imperative: bool,

    /// Extra base-form verbs the imperative check must accept.
    pub imperative_exceptions: Vec<String>,

    /// Extra third person forms the `-s` heuristic misses.
    pub irregular_third_person: Vec<String>,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            max_length: 100,
            case: SubjectCase::Lower,
            forbid_endings: [".", ",", ";", ":", "!", "?"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            require_imperative: true,
            imperative_exceptions: Vec::new(),
            irregular_third_person: Vec::new(),
        }
    }
}

/// Case policy for the first letter of the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SubjectCase {
    /// Capitalized first letter, as in a sentence.
    Sentence,
    /// Uppercase first letter.
    Upper,
    /// Lowercase first letter.
    #[default]
    Lower,
    /// No case check.
    Ignore,
}

impl SubjectCase {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectCase::Sentence => "sentence",
            SubjectCase::Upper => "upper",
            SubjectCase::Lower => "lower",
            SubjectCase::Ignore => "ignore",
        }
    }
}

impl std::fmt::Display for SubjectCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Body configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct BodyConfig {
    /// Whether a body is required.
    pub required: bool,

    /// Minimum body length, in characters, ignoring trailers.
    pub min_length: usize,

    /// Minimum number of distinct `Signed-off-by` trailers.
    pub min_signoff_count: usize,
}

/// Conventional commit configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConventionalConfig {
    /// Allowed commit types. `feat` and `fix` are always allowed.
    pub types: Vec<String>,

    /// Allowed scope patterns (regular expressions). Empty allows any scope.
    pub scopes: Vec<String>,

    /// Maximum length of the description, in characters.
    pub max_description_length: usize,
}

impl Default for ConventionalConfig {
    fn default() -> Self {
        Self {
            types: super::default::DEFAULT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            scopes: Vec::new(),
            max_description_length: 72,
        }
    }
}

/// JIRA reference configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct JiraConfig {
    /// Accepted project prefixes. Empty accepts any project.
    pub project_prefixes: Vec<String>,

    /// Whether the subject must carry a key.
    pub require_in_subject: bool,

    /// Whether the body must carry a `Refs:` line.
    pub require_in_body: bool,

    /// Keys matching any of these patterns are ignored.
    pub ignore_ticket_patterns: Vec<String>,
}

/// Signature configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SigningConfig {
    /// Accepted signature kinds: `gpg`, `ssh`.
    pub allowed_types: Vec<String>,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            allowed_types: vec!["gpg".to_string(), "ssh".to_string()],
        }
    }
}

/// Spell checking configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpellConfig {
    /// Spelling locale: `US` or `UK`.
    pub locale: String,

    /// Words never reported.
    pub ignore_words: Vec<String>,
}

impl Default for SpellConfig {
    fn default() -> Self {
        Self {
            locale: "US".to_string(),
            ignore_words: Vec::new(),
        }
    }
}

/// Repository configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch the ahead count is measured against.
    pub reference_branch: String,

    /// Maximum commits HEAD may be ahead of the reference branch.
    pub max_commits_ahead: usize,

    /// Branch patterns where the ahead check never runs.
    pub ignore_branches: Vec<String>,

    /// When non-empty, the ahead check only runs on matching branches.
    pub enforce_branches: Vec<String>,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            reference_branch: "main".to_string(),
            max_commits_ahead: 5,
            ignore_branches: Vec::new(),
            enforce_branches: Vec::new(),
        }
    }
}

/// Rule activation configuration.
///
/// The built-in default-off rules are not part of these lists; they stay off
/// unless named in `enabled`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Rules to run. Empty runs every registered rule.
    pub enabled: Vec<String>,

    /// Rules to skip. Names also listed in `enabled` stay on.
    pub disabled: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to use colors.
    pub color: bool,

    /// Whether to print verbose rule messages.
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: true,
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LintConfig::default();
        assert_eq!(config.message.subject.max_length, 100);
        assert_eq!(config.conventional.max_description_length, 72);
        assert_eq!(config.message.body.min_signoff_count, 0);
        assert!(config.rules.enabled.is_empty());
        assert!(config.rules.disabled.is_empty());
    }

    #[test]
    fn test_subject_case_display() {
        assert_eq!(SubjectCase::Sentence.to_string(), "sentence");
        assert_eq!(SubjectCase::default(), SubjectCase::Lower);
    }

    #[test]
    fn test_config_serialization() {
        let config = LintConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("max_description_length"));
        assert!(toml_str.contains("min_signoff_count"));
    }

    #[test]
    fn test_subject_case_deserialize() {
        let config: LintConfig = toml::from_str(
            r#"
[message.subject]
case = "sentence"
"#,
        )
        .unwrap();
        assert_eq!(config.message.subject.case, SubjectCase::Sentence);
    }
}
