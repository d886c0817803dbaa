// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rendering of validation results for terminals and machines.
//!
//! Renderers only read [`ValidationResults`]; they never re-run rules.

use std::sync::Arc;

use console::{style, Style};

use crate::error::{Result, ResultExt};
use crate::rules::{
    CommitResult, Rule, RuleResult, RuleStatus, ValidationError, ValidationResults,
};

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text output (default)
    #[default]
    Text,
    /// JSON output for machine parsing
    Json,
}

/// Render results in the requested format.
pub fn render(results: &ValidationResults, format: OutputFormat, verbose: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(results, verbose)),
        OutputFormat::Json => render_json(results),
    }
}

/// Pretty-printed JSON document of the whole run.
pub fn render_json(results: &ValidationResults) -> Result<String> {
    serde_json::to_string_pretty(results).context("Failed to serialize report")
}

/// Human-readable report. Verbose mode lists every rule of every commit,
/// passed and skipped ones included.
pub fn render_text(results: &ValidationResults, verbose: bool) -> String {
    let mut lines = Vec::new();

    for commit in &results.commit_results {
        lines.push(commit_header(commit));
        if verbose {
            for rule in &commit.rule_results {
                if rule.is_failed() {
                    lines.extend(rule.errors.iter().flat_map(format_error));
                } else {
                    lines.push(format_rule_status(rule));
                }
            }
        } else {
            for rule in commit.failures() {
                lines.extend(rule.errors.iter().flat_map(format_error));
            }
        }
    }

    if !results.commit_results.is_empty() {
        lines.push(String::new());
    }
    lines.extend(summary(results, verbose));
    lines.join("\n")
}

fn commit_header(commit: &CommitResult) -> String {
    let status = if commit.passed {
        style("✓").green().bold()
    } else {
        style("✗").red().bold()
    };
    let id = if commit.commit.hash.is_empty() {
        "message".to_string()
    } else {
        commit.commit.short_hash().to_string()
    };
    let mut header = format!("{} {} {}", status, style(id).cyan(), commit.commit.subject);
    if !commit.passed {
        let findings = format!("({} finding(s))", commit.error_count());
        header.push_str(&format!(" {}", style(findings).dim()));
    }
    header
}

fn format_error(error: &ValidationError) -> Vec<String> {
    let code_style = if error.is_configuration_error() {
        Style::new().yellow()
    } else {
        Style::new().red()
    };

    let mut lines = vec![format!(
        "  {} {} {} {}",
        style("✗").red(),
        code_style.apply_to(error.code),
        error.message,
        style(format!("[{}]", error.rule)).dim()
    )];
    if !error.help.is_empty() {
        lines.push(format!("    {} {}", style("→").dim(), style(&error.help).dim()));
    }
    lines
}

fn format_rule_status(rule: &RuleResult) -> String {
    let marker = match rule.status {
        RuleStatus::Passed => style("✓").green(),
        RuleStatus::Skipped => style("-").dim(),
        RuleStatus::Failed => style("✗").red(),
    };
    format!(
        "  {} {} {}",
        marker,
        rule.rule_name,
        style(format!("({})", rule.status)).dim()
    )
}

fn summary(results: &ValidationResults, verbose: bool) -> Vec<String> {
    let counts = format!(
        "{}/{} commit(s) passed",
        results.passed_commits, results.total_commits
    );
    let mut lines = vec![if results.all_passed() {
        format!("{} {}", style("✓").green().bold(), counts)
    } else {
        format!("{} {}", style("✗").red().bold(), counts)
    }];

    for (rule, failures) in &results.rule_summary {
        if *failures > 0 || verbose {
            lines.push(format!("  {}: {} failure(s)", rule, failures));
        }
    }
    lines
}

/// Listing for `msglint rules`.
pub fn render_rule_list(rules: &[(Arc<dyn Rule>, bool)]) -> String {
    rules
        .iter()
        .map(|(rule, active)| {
            let marker = if *active {
                style("✓").green()
            } else {
                style("-").dim()
            };
            format!(
                "{} {:<20} {:<20} {}",
                marker,
                rule.name(),
                style(rule.id()).cyan(),
                style(rule.description()).dim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
