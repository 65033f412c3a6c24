//! Vocabulary seed files.
//!
//! A seed is a TOML document listing the controlled terms of every kind plus
//! the per-language rules. [`VocabularySeed::builtin`] embeds
//! `seeds/default_vocabulary.toml`.

use std::path::Path;

use serde::Deserialize;

use crate::error::DatabaseError;

const DEFAULT_SEED: &str = include_str!("../seeds/default_vocabulary.toml");

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct VocabularySeed {
    #[serde(default)]
    pub languages: Vec<LanguageSeed>,
    #[serde(default)]
    pub parts_of_speech: Vec<TermSeed>,
    #[serde(default)]
    pub grammatical_genders: Vec<TermSeed>,
    #[serde(default)]
    pub grammatical_numbers: Vec<TermSeed>,
    #[serde(default)]
    pub administrative_statuses: Vec<StatusSeed>,
    #[serde(default)]
    pub administrative_status_reasons: Vec<ReasonSeed>,
    #[serde(default)]
    pub external_link_types: Vec<TermSeed>,
    #[serde(default)]
    pub language_rules: Vec<LanguageRulesSeed>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LanguageSeed {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct TermSeed {
    pub name: String,
    pub representation: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct StatusSeed {
    pub name: String,
    pub representation: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub allows_reason: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReasonSeed {
    pub name: String,
    pub representation: String,
    #[serde(default)]
    pub description: String,
    /// Codes of the languages this reason applies to.
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Rules for one language. Vocabulary terms are named by representation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LanguageRulesSeed {
    pub language: String,
    #[serde(default)]
    pub parts_of_speech: Vec<PartOfSpeechRuleSeed>,
    #[serde(default)]
    pub genders: Vec<String>,
    #[serde(default)]
    pub numbers: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct PartOfSpeechRuleSeed {
    pub part_of_speech: String,
    #[serde(default)]
    pub gender: bool,
    #[serde(default)]
    pub number: bool,
}

impl VocabularySeed {
    /// The seed shipped with termbase.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Seed` if the embedded file does not parse.
    pub fn builtin() -> Result<Self, DatabaseError> {
        Self::from_toml_str(DEFAULT_SEED)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::Seed` with the TOML parser's message.
    pub fn from_toml_str(source: &str) -> Result<Self, DatabaseError> {
        toml::from_str(source).map_err(|e| DatabaseError::Seed(e.to_string()))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::Seed` if the file can not be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, DatabaseError> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| DatabaseError::Seed(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&source)
    }

    /// Total number of vocabulary terms in the seed.
    #[must_use]
    pub fn term_count(&self) -> usize {
        self.languages.len()
            + self.parts_of_speech.len()
            + self.grammatical_genders.len()
            + self.grammatical_numbers.len()
            + self.administrative_statuses.len()
            + self.administrative_status_reasons.len()
            + self.external_link_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_seed_parses() {
        let seed = VocabularySeed::builtin().unwrap();
        assert!(seed.languages.iter().any(|l| l.code == "en"));
        let names: Vec<_> = seed
            .administrative_statuses
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Preferred", "Admitted", "Not recommended", "Deprecated"]
        );
        for term_type in ["abbreviation", "acronym", "phraseologicalUnit"] {
            assert!(
                seed.parts_of_speech
                    .iter()
                    .any(|p| p.representation == term_type),
                "missing part of speech '{term_type}'"
            );
        }
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let seed = VocabularySeed::from_toml_str(
            r#"
[[languages]]
code = "en"
name = "English"
"#,
        )
        .unwrap();
        assert_eq!(seed.term_count(), 1);
        assert!(seed.language_rules.is_empty());
    }

    #[test]
    fn malformed_seed_rejected() {
        let err = VocabularySeed::from_toml_str("[[languages]]\ncode = 3").unwrap_err();
        assert!(matches!(err, DatabaseError::Seed(_)));
    }
}
