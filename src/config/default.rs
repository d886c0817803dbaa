// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

/// Conventional commit types allowed out of the box.
pub const DEFAULT_TYPES: &[&str] = &[
    "feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert",
];

/// Rules that need extra setup (a git repository, a ticket workflow, a
/// signing setup) and are off unless a project turns them on.
pub const DEFAULT_DISABLED_RULES: &[&str] = &["CommitsAhead", "JiraReference", "Signature", "Spell"];

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# msglint configuration
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

# Subject line policy
[message.subject]
max_length = 100
case = "lower"              # sentence | upper | lower | ignore
forbid_endings = [".", ",", ";", ":", "!", "?"]
require_imperative = true
imperative_exceptions = []
irregular_third_person = []

# Body policy
[message.body]
required = false
min_length = 0
min_signoff_count = 1

# Conventional commits
[conventional]
types = ["feat", "fix", "docs", "style", "refactor", "perf", "test", "build", "ci", "chore", "revert"]
scopes = ["api", "cli", "core", "deps(-dev)?"]
max_description_length = 72

# JIRA references
[jira]
project_prefixes = ["PROJ", "OPS"]
require_in_subject = false
require_in_body = true
ignore_ticket_patterns = ["^TEMP-\\d+$"]

# Commit signatures
[signing]
allowed_types = ["gpg", "ssh"]

# Spell checking
[spell]
locale = "US"
ignore_words = ["msglint"]

# Ahead-of-reference check
[repo]
reference_branch = "main"
max_commits_ahead = 5
ignore_branches = ["main", "release/*"]
enforce_branches = []

# Rule activation: enabled wins over disabled.
# CommitsAhead, JiraReference, Signature and Spell are off unless enabled.
[rules]
enabled = []
disabled = []

# Report output
[output]
color = true
verbose = false
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;

    #[test]
    fn test_default_config() {
        let config = LintConfig::default();
        assert_eq!(config.message.subject.max_length, 100);
        assert_eq!(config.conventional.types.len(), DEFAULT_TYPES.len());
    }

    #[test]
    fn test_example_config_parseable() {
        let example = example_config();
        let config: LintConfig = toml::from_str(example).expect("Example config should parse");
        assert_eq!(config.message.body.min_signoff_count, 1);
        assert_eq!(config.jira.project_prefixes, vec!["PROJ", "OPS"]);
    }

    #[test]
    fn test_example_config_compiles() {
        let config: LintConfig = toml::from_str(example_config()).unwrap();
        assert!(crate::config::RuleConfiguration::try_from(&config).is_ok());
    }
}
