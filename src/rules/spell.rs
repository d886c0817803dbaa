// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Spelling checks over the commit message.
//!
//! The rule owns text preparation and filtering; finding misspellings is
//! delegated to a [`SpellChecker`]. The built-in checker is a lookup table of
//! common mistakes plus locale variants, not a dictionary.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::commit::Commit;
use crate::config::RuleConfiguration;

use super::body::is_trailer;
use super::result::{ErrorCode, ValidationError};
use super::rule::Rule;

lazy_static! {
    static ref COMMON: HashMap<&'static str, &'static str> = [
        ("accomodate", "accommodate"),
        ("acheive", "achieve"),
        ("accross", "across"),
        ("adress", "address"),
        ("agressive", "aggressive"),
        ("alot", "a lot"),
        ("arguement", "argument"),
        ("begining", "beginning"),
        ("beleive", "believe"),
        ("calender", "calendar"),
        ("commited", "committed"),
        ("comitted", "committed"),
        ("compatability", "compatibility"),
        ("compatable", "compatible"),
        ("concurent", "concurrent"),
        ("definately", "definitely"),
        ("dependancy", "dependency"),
        ("dependancies", "dependencies"),
        ("depricated", "deprecated"),
        ("enviroment", "environment"),
        ("existance", "existence"),
        ("explicitely", "explicitly"),
        ("funtion", "function"),
        ("grammer", "grammar"),
        ("guarentee", "guarantee"),
        ("independant", "independent"),
        ("initalize", "initialize"),
        ("lenght", "length"),
        ("neccessary", "necessary"),
        ("occured", "occurred"),
        ("occurence", "occurrence"),
        ("paramater", "parameter"),
        ("paramter", "parameter"),
        ("performace", "performance"),
        ("persistant", "persistent"),
        ("posible", "possible"),
        ("recieve", "receive"),
        ("recieved", "received"),
        ("refered", "referred"),
        ("relevent", "relevant"),
        ("repositry", "repository"),
        ("reponse", "response"),
        ("retreive", "retrieve"),
        ("seperate", "separate"),
        ("seperator", "separator"),
        ("succesful", "successful"),
        ("successfull", "successful"),
        ("sucess", "success"),
        ("teh", "the"),
        ("threshhold", "threshold"),
        ("uneccessary", "unnecessary"),
        ("untill", "until"),
        ("wich", "which"),
        ("writting", "writing"),
    ]
    .into_iter()
    .collect();

    /// British spellings and their American counterparts.
    static ref BRITISH_TO_AMERICAN: HashMap<&'static str, &'static str> = [
        ("analyse", "analyze"),
        ("authorise", "authorize"),
        ("behaviour", "behavior"),
        ("cancelled", "canceled"),
        ("catalogue", "catalog"),
        ("centre", "center"),
        ("colour", "color"),
        ("customise", "customize"),
        ("defence", "defense"),
        ("favour", "favor"),
        ("finalise", "finalize"),
        ("flavour", "flavor"),
        ("grey", "gray"),
        ("honour", "honor"),
        ("initialise", "initialize"),
        ("labour", "labor"),
        ("licence", "license"),
        ("maximise", "maximize"),
        ("minimise", "minimize"),
        ("modelling", "modeling"),
        ("neighbour", "neighbor"),
        ("normalise", "normalize"),
        ("optimise", "optimize"),
        ("organise", "organize"),
        ("prioritise", "prioritize"),
        ("realise", "realize"),
        ("recognise", "recognize"),
        ("serialise", "serialize"),
        ("synchronise", "synchronize"),
        ("travelled", "traveled"),
        ("utilise", "utilize"),
    ]
    .into_iter()
    .collect();

    static ref AMERICAN_TO_BRITISH: HashMap<&'static str, &'static str> = BRITISH_TO_AMERICAN
        .iter()
        .map(|(british, american)| (*american, *british))
        .collect();

    /// Identifiers and jargon that show up in commit messages and must
    /// never be reported, whatever the checker thinks. Locale spellings
    /// stay out of this list so both locale tables keep working.
    static ref TECHNICAL_TERMS: HashSet<&'static str> = [
        "api", "args", "async", "auth", "backend", "bool", "changelog", "ci", "cli",
        "config", "cpu", "css", "dedupe", "deps", "dev", "enum", "env", "frontend", "gpg",
        "http", "https", "impl", "init", "json", "lint", "localhost", "mutex", "namespace",
        "oauth", "param", "params", "readme", "refactor", "regex", "repo", "rustfmt", "ssh",
        "stderr", "stdin", "stdout", "struct", "subcommand", "toml", "tokio", "url", "utf",
        "uuid", "yaml",
    ]
    .into_iter()
    .collect();
}

/// Characters treated as word separators before checking.
const SEPARATORS: &[char] = &[
    '_', '/', '\\', '|', '=', '+', '*', '`', '~', '<', '>', '[', ']', '{', '}', '(', ')', '#',
];

/// One misspelled word and its suggested replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Misspelling {
    pub word: String,
    pub suggestion: String,
}

/// Finds misspellings in prepared text.
pub trait SpellChecker: Send + Sync + std::fmt::Debug {
    fn check(&self, text: &str) -> Vec<Misspelling>;
}

/// Table-driven checker: common mistakes plus the spellings of the other
/// locale.
#[derive(Debug, Clone, Copy)]
pub struct MisspellingTable {
    locale: &'static HashMap<&'static str, &'static str>,
}

impl MisspellingTable {
    /// `US` flags British spellings, `UK` flags American ones.
    pub fn for_locale(locale: &str) -> Self {
        let locale = if locale.eq_ignore_ascii_case("UK") {
            &*AMERICAN_TO_BRITISH
        } else {
            &*BRITISH_TO_AMERICAN
        };
        Self { locale }
    }

    fn lookup(&self, word: &str) -> Option<&'static str> {
        COMMON.get(word).or_else(|| self.locale.get(word)).copied()
    }
}

impl SpellChecker for MisspellingTable {
    fn check(&self, text: &str) -> Vec<Misspelling> {
        words(text)
            .filter_map(|word| {
                let suggestion = self.lookup(&word.to_lowercase())?;
                Some(Misspelling {
                    word: word.to_string(),
                    suggestion: match_case(word, suggestion),
                })
            })
            .collect()
    }
}

/// Split text into checkable words. Identifiers with inner capitals or
/// digits are left alone.
fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .filter(|w| w.chars().all(char::is_alphabetic))
        .filter(|w| !w.chars().skip(1).any(char::is_uppercase))
}

fn match_case(word: &str, suggestion: &str) -> String {
    if word.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = suggestion.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        suggestion.to_string()
    }
}

/// Strip markup and body trailers so only prose reaches the checker.
pub fn prepare_text(commit: &Commit) -> String {
    std::iter::once(commit.subject.as_str())
        .chain(commit.body_lines().filter(|line| !is_trailer(line)))
        .map(|line| {
            line.trim_start()
                .trim_start_matches('#')
                .replace(SEPARATORS, " ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reports misspelled words in the subject and body.
#[derive(Debug, Default, Clone)]
pub struct SpellRule {
    checker: Option<Arc<dyn SpellChecker>>,
}

impl SpellRule {
    const NAME: &'static str = "Spell";

    /// Use a custom checker. Without one, a [`MisspellingTable`] for the
    /// configured locale is used.
    pub fn new(checker: Option<Arc<dyn SpellChecker>>) -> Self {
        Self { checker }
    }
}

impl Rule for SpellRule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn id(&self) -> &'static str {
        "spell"
    }

    fn description(&self) -> &'static str {
        "No common misspellings or wrong-locale spellings"
    }

    fn validate(&self, commit: &Commit, config: &RuleConfiguration) -> Vec<ValidationError> {
        let text = prepare_text(commit);
        let found = match &self.checker {
            Some(checker) => checker.check(&text),
            None => MisspellingTable::for_locale(&config.spell.locale).check(&text),
        };

        let mut seen = HashSet::new();
        found
            .into_iter()
            .filter(|m| {
                let key = m.word.to_lowercase();
                !config.spell.ignore_words.contains(&key)
                    && !TECHNICAL_TERMS.contains(key.as_str())
                    && seen.insert(key)
            })
            .map(|m| {
                ValidationError::new(
                    Self::NAME,
                    ErrorCode::Misspelling,
                    format!("'{}' is misspelled, did you mean '{}'?", m.word, m.suggestion),
                )
                .with_context("word", &m.word)
                .with_context("suggestion", &m.suggestion)
                .with_help("Fix the spelling or add the word to spell.ignore_words")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintConfig;

    fn config(locale: &str, ignore: &[&str]) -> RuleConfiguration {
        let mut lint = LintConfig::default();
        lint.spell.locale = locale.to_string();
        lint.spell.ignore_words = ignore.iter().map(|w| w.to_string()).collect();
        RuleConfiguration::try_from(&lint).unwrap()
    }

    fn words_found(message: &str, config: &RuleConfiguration) -> Vec<String> {
        SpellRule::default()
            .validate(&Commit::from_message("", message), config)
            .into_iter()
            .map(|e| e.context["word"].clone())
            .collect()
    }

    #[test]
    fn test_common_misspellings() {
        let errors = SpellRule::default().validate(
            &Commit::from_message("", "fix: handle seperate enviroment"),
            &config("US", &[]),
        );
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].code, ErrorCode::Misspelling);
        assert_eq!(errors[0].context["suggestion"], "separate");
        assert_eq!(errors[1].context["suggestion"], "environment");
    }

    #[test]
    fn test_locale_tables() {
        let message = "docs: rename colour and organize modules";
        assert_eq!(words_found(message, &config("US", &[])), vec!["colour"]);
        assert_eq!(words_found(message, &config("UK", &[])), vec!["organize"]);
    }

    #[test]
    fn test_uk_locale_flags_american_spellings() {
        let message = "feat: normalize color and behavior";
        assert_eq!(
            words_found(message, &config("UK", &[])),
            vec!["normalize", "color", "behavior"]
        );
        assert!(words_found(message, &config("US", &[])).is_empty());
    }

    #[test]
    fn test_technical_terms_never_reach_the_report() {
        for (british, american) in BRITISH_TO_AMERICAN.iter() {
            assert!(!TECHNICAL_TERMS.contains(british), "{british}");
            assert!(!TECHNICAL_TERMS.contains(american), "{american}");
        }
        let rule = SpellRule::new(Some(Arc::new(Everything)));
        let errors = rule.validate(&Commit::from_message("", "toml regex"), &config("US", &[]));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_ignore_words_case_insensitive() {
        assert!(words_found("fix: Teh typo", &config("US", &["TEH"])).is_empty());
    }

    #[test]
    fn test_trailers_and_markup_are_skipped() {
        let message = "fix: x\n\n## Recieve path\nsee foo_teh_bar\n\nCo-authored-by: Teh Dev <t@example.com>";
        assert_eq!(words_found(message, &config("US", &[])), vec!["Recieve", "teh"]);
    }

    #[test]
    fn test_identifiers_are_left_alone() {
        assert!(words_found("fix: rename parseTeh and teh2", &config("US", &[])).is_empty());
    }

    #[test]
    fn test_repeated_word_reported_once() {
        assert_eq!(words_found("fix: teh teh Teh", &config("US", &[])), vec!["teh"]);
    }

    #[test]
    fn test_suggestion_keeps_capital() {
        let table = MisspellingTable::for_locale("US");
        let found = table.check("Recieve");
        assert_eq!(found[0].suggestion, "Receive");
    }

    #[derive(Debug)]
    struct Everything;

    impl SpellChecker for Everything {
        fn check(&self, text: &str) -> Vec<Misspelling> {
            text.split_whitespace()
                .map(|w| Misspelling {
                    word: w.to_string(),
                    suggestion: "x".to_string(),
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_checker_is_filtered() {
        let rule = SpellRule::new(Some(Arc::new(Everything)));
        let errors = rule.validate(&Commit::from_message("", "api word"), &config("US", &[]));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].context["word"], "word");
    }
}
