// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Imperative mood classification for the first word of a subject.
//!
//! Suffix heuristics are approximate, so every known false positive lives
//! in an exception table rather than in the matching logic.

use std::collections::HashSet;
use std::fmt;

use lazy_static::lazy_static;

lazy_static! {
    /// Base forms that end in `-ed`.
    static ref BASE_FORMS_ED: Vec<&'static str> = vec![
        "bed", "bleed", "breed", "embed", "exceed", "feed", "heed", "need", "proceed",
        "red", "seed", "shed", "shred", "speed", "succeed", "weed",
    ];

    /// Base forms that end in `-ing`.
    static ref BASE_FORMS_ING: Vec<&'static str> = vec![
        "bring", "ping", "ring", "sing", "sling", "spring", "sting", "string", "swing", "wring",
    ];

    /// Base forms that end in `-s`.
    static ref BASE_FORMS_S: Vec<&'static str> = vec![
        "access", "address", "alias", "bias", "bless", "bypass", "canvas", "compress",
        "cross", "discuss", "dismiss", "express", "focus", "gas", "harass", "miss",
        "pass", "press", "process", "progress", "redress", "stress", "toss",
    ];

    /// Third person forms that do not follow the plain `-s` pattern.
    static ref IRREGULAR_THIRD_PERSON: Vec<&'static str> = vec!["does", "goes", "has", "is"];
}

/// How a first word reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
    Imperative,
    PastTense,
    Gerund,
    ThirdPerson,
}

impl VerbForm {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            VerbForm::Imperative => "imperative",
            VerbForm::PastTense => "past_tense",
            VerbForm::Gerund => "gerund",
            VerbForm::ThirdPerson => "third_person",
        }
    }
}

impl fmt::Display for VerbForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Words the suffix heuristics must accept as base forms, plus irregular
/// third person forms they would otherwise miss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImperativeExceptions {
    base_forms: HashSet<String>,
    irregular_third_person: HashSet<String>,
}

impl Default for ImperativeExceptions {
    fn default() -> Self {
        let base_forms = BASE_FORMS_ED
            .iter()
            .chain(BASE_FORMS_ING.iter())
            .chain(BASE_FORMS_S.iter())
            .map(|w| w.to_string())
            .collect();
        let irregular_third_person = IRREGULAR_THIRD_PERSON
            .iter()
            .map(|w| w.to_string())
            .collect();

        Self {
            base_forms,
            irregular_third_person,
        }
    }
}

impl ImperativeExceptions {
    /// Add base forms to accept.
    pub fn with_base_forms<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
        self.base_forms
            .extend(words.into_iter().map(|w| w.trim().to_lowercase()));
        self
    }

    /// Add irregular third person forms to reject.
    pub fn with_irregular_third_person<'a>(
        mut self,
        words: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.irregular_third_person
            .extend(words.into_iter().map(|w| w.trim().to_lowercase()));
        self
    }

    /// Whether `word` is a known base form.
    pub fn is_base_form(&self, word: &str) -> bool {
        self.base_forms.contains(&word.to_lowercase())
    }

    /// Classify a word.
    pub fn classify(&self, word: &str) -> VerbForm {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();

        if word.is_empty() || self.base_forms.contains(&word) {
            return VerbForm::Imperative;
        }
        if self.irregular_third_person.contains(&word) {
            return VerbForm::ThirdPerson;
        }

        let len = word.chars().count();
        if len > 3 && word.ends_with("ed") {
            VerbForm::PastTense
        } else if len > 4 && word.ends_with("ing") {
            VerbForm::Gerund
        } else if len > 3 && word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us")
        {
            VerbForm::ThirdPerson
        } else {
            VerbForm::Imperative
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_violations() {
        let exceptions = ImperativeExceptions::default();
        assert_eq!(exceptions.classify("Added"), VerbForm::PastTense);
        assert_eq!(exceptions.classify("fixing"), VerbForm::Gerund);
        assert_eq!(exceptions.classify("updates"), VerbForm::ThirdPerson);
        assert_eq!(exceptions.classify("has"), VerbForm::ThirdPerson);
    }

    #[test]
    fn test_classify_imperative() {
        let exceptions = ImperativeExceptions::default();
        for word in ["add", "fix", "embed", "bring", "process", "focus", "use", "run", "bump"] {
            assert_eq!(exceptions.classify(word), VerbForm::Imperative, "{word}");
        }
    }

    #[test]
    fn test_classify_strips_punctuation() {
        let exceptions = ImperativeExceptions::default();
        assert_eq!(exceptions.classify("\"Removed,"), VerbForm::PastTense);
        assert_eq!(exceptions.classify("`add`"), VerbForm::Imperative);
    }

    #[test]
    fn test_short_words_are_not_judged() {
        let exceptions = ImperativeExceptions::default();
        assert_eq!(exceptions.classify("bus"), VerbForm::Imperative);
        assert_eq!(exceptions.classify("sing"), VerbForm::Imperative);
    }

    #[test]
    fn test_extension() {
        let exceptions = ImperativeExceptions::default().with_base_forms(["Unshred"]);
        assert_eq!(exceptions.classify("unshred"), VerbForm::Imperative);

        let exceptions = ImperativeExceptions::default().with_irregular_third_person(["Was"]);
        assert_eq!(exceptions.classify("was"), VerbForm::ThirdPerson);
        assert_eq!(exceptions.classify("has"), VerbForm::ThirdPerson);
    }
}
