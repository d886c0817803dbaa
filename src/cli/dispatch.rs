// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Command dispatch and execution.

use std::path::Path;
use std::sync::Arc;

use crate::commit::Commit;
use crate::config::{default::example_config, LintConfig, RuleConfiguration};
use crate::error::{ConfigError, LintError, Result, ResultExt};
use crate::git::{CommitReader, Repository};
use crate::report::{self, OutputFormat};
use crate::rules::{CommitAnalyzer, RuleRegistry, ValidationEngine};

use super::args::{CheckArgs, Cli, Commands, InitArgs};

/// File written by `msglint init`.
const INIT_FILE: &str = "msglint.toml";

/// Run the CLI with the given arguments.
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        disable_colors();
    }

    match &cli.command {
        Commands::Check(args) => run_check(&cli, args),
        Commands::Rules => run_rules(&cli),
        Commands::Init(args) => run_init(args),
        Commands::Version => run_version(),
    }
}

fn disable_colors() {
    console::set_colors_enabled(false);
    console::set_colors_enabled_stderr(false);
}

fn load_config(cli: &Cli) -> Result<LintConfig> {
    let config = match &cli.config {
        Some(path) => LintConfig::load_from(path)?,
        None => LintConfig::load()?,
    };
    if !config.output.color {
        disable_colors();
    }
    Ok(config)
}

/// Registry with the configured activation applied, then the command line
/// overrides on top.
fn build_registry(
    rule_config: &RuleConfiguration,
    analyzer: Option<Arc<dyn CommitAnalyzer>>,
    args: Option<&CheckArgs>,
) -> RuleRegistry {
    let mut registry = RuleRegistry::with_defaults(analyzer, None);
    registry.apply_policy(
        &rule_config.enabled_rules,
        &rule_config.effective_disabled_rules(),
    );

    if let Some(args) = args {
        if !args.enable.is_empty() {
            registry.set_active_rules(&args.enable);
        }
        registry.disable_rules(&args.disable);
    }
    registry
}

/// Run the check command.
fn run_check(cli: &Cli, args: &CheckArgs) -> Result<()> {
    tracing::debug!("Running check command with args: {:?}", args);

    let config = load_config(cli)?;
    let rule_config = Arc::new(RuleConfiguration::try_from(&config)?);

    let (repo, commits) = match &args.message_file {
        Some(path) => {
            // Outside a repository only CommitsAhead loses its analyzer.
            let repo = Repository::open_current().ok().map(Arc::new);
            (repo, vec![read_message_file(path)?])
        }
        None => {
            let repo = Arc::new(Repository::open_current()?);
            let commits = collect_commits(&*repo, args)?;
            (Some(repo), commits)
        }
    };

    let analyzer = repo.map(|repo| repo as Arc<dyn CommitAnalyzer>);
    let registry = build_registry(&rule_config, analyzer, Some(args));
    let engine = ValidationEngine::new(registry, rule_config).with_jobs(args.jobs);

    let results = engine.validate_commits(&commits)?;

    let format = cli.format.unwrap_or_default();
    let verbose = args.verbose || config.output.verbose;
    println!("{}", report::render(&results, format, verbose)?);

    if results.all_passed() {
        Ok(())
    } else {
        Err(LintError::ValidationFailed {
            failed: results.failed_commits(),
            total: results.total_commits,
        })
    }
}

fn read_message_file(path: &Path) -> Result<Commit> {
    let text = std::fs::read_to_string(path)
        .context(format!("Failed to read message file {}", path.display()))?;
    Ok(Commit::from_edit_message(&text))
}

fn collect_commits(reader: &dyn CommitReader, args: &CheckArgs) -> Result<Vec<Commit>> {
    if args.is_range() {
        reader.read_range(&args.range_spec())
    } else {
        Ok(vec![reader.read_commit(&args.target)?])
    }
}

/// Run the rules command.
fn run_rules(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let rule_config = RuleConfiguration::try_from(&config)?;
    let registry = build_registry(&rule_config, None, None);
    let rules = registry.all_rules();

    match cli.format.unwrap_or_default() {
        OutputFormat::Json => {
            let listing: Vec<_> = rules
                .iter()
                .map(|(rule, active)| {
                    serde_json::json!({
                        "name": rule.name(),
                        "id": rule.id(),
                        "description": rule.description(),
                        "active": active,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&listing).context("Failed to serialize rules")?;
            println!("{}", json);
        }
        OutputFormat::Text => println!("{}", report::render_rule_list(&rules)),
    }

    Ok(())
}

/// Run the init command.
fn run_init(args: &InitArgs) -> Result<()> {
    tracing::debug!("Running init command with args: {:?}", args);

    let config_path = Path::new(INIT_FILE);
    if config_path.exists() && !args.force {
        return Err(LintError::Config(ConfigError::AlreadyExists {
            path: config_path.to_path_buf(),
        }));
    }

    std::fs::write(config_path, example_config())?;

    println!("✓ Created {}", INIT_FILE);

    Ok(())
}

/// Run the version command.
fn run_version() -> Result<()> {
    println!("msglint {}", crate::version::version_string());

    if let Some(sha) = crate::version::GIT_SHA {
        println!("git commit: {}", sha);
    }
    if let Some(date) = crate::version::GIT_COMMIT_DATE {
        println!("commit date: {}", date);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn check_args(enable: &[&str], disable: &[&str]) -> CheckArgs {
        CheckArgs {
            enable: enable.iter().map(|s| s.to_string()).collect(),
            disable: disable.iter().map(|s| s.to_string()).collect(),
            ..CheckArgs::default()
        }
    }

    #[test]
    fn test_default_activation() {
        let config = RuleConfiguration::default();
        let registry = build_registry(&config, None, None);
        assert!(registry.is_active("ConventionalCommit"));
        assert!(registry.is_active("SignOff"));
        assert!(!registry.is_active("Spell"));
        assert!(!registry.is_active("JiraReference"));
    }

    #[test]
    fn test_config_enabled_wins_over_default_disabled() {
        let lint = parse_config("[rules]\nenabled = [\"Spell\", \"Subject\"]").unwrap();
        let config = RuleConfiguration::try_from(&lint).unwrap();
        let registry = build_registry(&config, None, None);
        assert!(registry.is_active("Spell"));
        assert!(registry.is_active("Subject"));
        assert!(!registry.is_active("ConventionalCommit"));
    }

    #[test]
    fn test_config_disable_keeps_defaults_off() {
        let lint = parse_config("[rules]\ndisabled = [\"Subject\"]").unwrap();
        let config = RuleConfiguration::try_from(&lint).unwrap();
        let registry = build_registry(&config, None, None);

        let active: Vec<&str> = registry.active_rules().iter().map(|r| r.name()).collect();
        assert_eq!(active, vec!["CommitBody", "ConventionalCommit", "SignOff"]);

        let engine = ValidationEngine::new(registry, Arc::new(config));
        let result = engine
            .validate_commit(&Commit::from_message("", "feat: add login"))
            .unwrap();
        assert!(result.passed);
    }

    #[test]
    fn test_command_line_overrides() {
        let config = RuleConfiguration::default();
        let args = check_args(&["spell", "subject"], &["subject"]);
        let registry = build_registry(&config, None, Some(&args));
        assert!(registry.is_active("Spell"));
        assert!(!registry.is_active("Subject"));
        assert_eq!(registry.active_rules().len(), 1);
    }

    #[test]
    fn test_read_message_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("COMMIT_EDITMSG");
        std::fs::write(&path, "fix: handle eof\n\n# comment\nDetails\n").unwrap();

        let commit = read_message_file(&path).unwrap();
        assert_eq!(commit.subject, "fix: handle eof");
        assert_eq!(commit.body, "Details");
        assert!(commit.hash.is_empty());
    }

    #[test]
    fn test_read_missing_message_file() {
        let err = read_message_file(Path::new("/nonexistent/COMMIT_EDITMSG")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Failed to read message file"));
    }
}
