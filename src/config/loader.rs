// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration loading and merging.

use crate::error::{ConfigError, LintError, Result};
use std::path::{Path, PathBuf};

use super::schema::LintConfig;

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &["msglint.toml", ".msglint.toml", ".config/msglint.toml"];

/// Find the project configuration file in the current directory or its parents.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the project configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // Try parent directory
        if !current.pop() {
            break;
        }
    }

    None
}

/// Location of the per-user configuration file.
pub fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("msglint").join("config.toml");
    path.exists().then_some(path)
}

/// Load configuration from the default locations.
///
/// The user file is the base layer and the project file is laid over it.
pub fn load_config() -> Result<LintConfig> {
    let user = user_config_file();
    let project = find_config_file();

    match (user, project) {
        (None, None) => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(LintConfig::default())
        }
        (Some(path), None) | (None, Some(path)) => load_config_from(&path),
        (Some(user), Some(project)) => {
            tracing::debug!("Layering {:?} over {:?}", project, user);
            let base = read_value(&user)?;
            let overlay = read_value(&project)?;
            from_value(merge_values(base, overlay))
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<LintConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);
    from_value(read_value(path)?)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<LintConfig> {
    toml::from_str(content).map_err(|e| {
        LintError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}

/// Merge two configuration documents, with the overlay taking precedence.
///
/// Tables merge key by key; any other value in the overlay replaces the base
/// value wholesale, so a project `rules.disabled = []` really clears the list.
pub fn merge_configs(base: &str, overlay: &str) -> Result<LintConfig> {
    let base = parse_value(base)?;
    let overlay = parse_value(overlay)?;
    from_value(merge_values(base, overlay))
}

fn merge_values(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            toml::Value::Table(base)
        }
        (_, overlay) => overlay,
    }
}

fn read_value(path: &Path) -> Result<toml::Value> {
    if !path.exists() {
        return Err(LintError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        LintError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_value(&content)
}

fn parse_value(content: &str) -> Result<toml::Value> {
    toml::from_str::<toml::Table>(content).map(toml::Value::Table).map_err(|e| {
        LintError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })
}

fn from_value(value: toml::Value) -> Result<LintConfig> {
    value.try_into().map_err(|e: toml::de::Error| {
        LintError::Config(ConfigError::ParseError {
            message: format!("Invalid configuration: {}", e),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubjectCase;
    use tempfile::TempDir;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.message.subject.max_length, 100);
    }

    #[test]
    fn test_parse_custom_config() {
        let toml = r#"
[message.subject]
max_length = 50
case = "upper"

[conventional]
types = ["feat", "fix"]

[jira]
require_in_subject = true
"#;
        let config = parse_config(toml).unwrap();
        assert_eq!(config.message.subject.max_length, 50);
        assert_eq!(config.message.subject.case, SubjectCase::Upper);
        assert_eq!(config.conventional.types, vec!["feat", "fix"]);
        assert!(config.jira.require_in_subject);
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = parse_config("[message.subject]\nmax_length = \"long\"");
        assert!(matches!(
            result,
            Err(LintError::Config(ConfigError::ParseError { .. }))
        ));
    }

    #[test]
    fn test_merge_configs() {
        let base = r#"
[message.subject]
max_length = 60
require_imperative = false

[rules]
disabled = ["Spell"]
"#;
        let overlay = r#"
[message.subject]
max_length = 50

[rules]
disabled = []
"#;
        let merged = merge_configs(base, overlay).unwrap();

        assert_eq!(merged.message.subject.max_length, 50);
        assert!(!merged.message.subject.require_imperative);
        assert!(merged.rules.disabled.is_empty());
    }

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(".msglint.toml"), "").unwrap();

        let found = find_config_file_from(&nested).unwrap();
        assert_eq!(found, dir.path().join(".msglint.toml"));
    }

    #[test]
    fn test_load_config_from_missing_path() {
        let dir = TempDir::new().unwrap();
        let result = load_config_from(&dir.path().join("nope.toml"));
        assert!(matches!(
            result,
            Err(LintError::Config(ConfigError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("msglint.toml");
        std::fs::write(&path, "[message.body]\nmin_signoff_count = 2\n").unwrap();

        let config = load_config_from(&path).unwrap();
        assert_eq!(config.message.body.min_signoff_count, 2);
    }
}
