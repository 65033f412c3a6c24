//! Vocabulary lookup capability and its in-memory registry.
//!
//! The importer resolves every TBX attribute string through [`VocabularyLookup`];
//! the validator and the exporter read vocabulary terms back by id. The store
//! loads the whole vocabulary into a [`Vocabulary`] once per operation, which
//! keeps resolution synchronous.

use std::collections::HashMap;

use crate::entities::{LanguageRules, VocabularyTerm};
use crate::enums::VocabularyKind;

/// Read access to the controlled vocabularies.
///
/// String lookups are case-insensitive.
pub trait VocabularyLookup {
    /// Find the term of `kind` whose TBX representation is `representation`.
    fn resolve(&self, kind: VocabularyKind, representation: &str) -> Option<&VocabularyTerm>;

    /// Find a term by id.
    fn term(&self, kind: VocabularyKind, id: i64) -> Option<&VocabularyTerm>;

    /// Find a term by its display name.
    fn find_by_name(&self, kind: VocabularyKind, name: &str) -> Option<&VocabularyTerm>;

    /// The vocabulary subsets allowed for a language code, if any were declared.
    fn language_rules(&self, code: &str) -> Option<&LanguageRules>;
}

/// In-memory vocabulary registry.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: HashMap<(VocabularyKind, i64), VocabularyTerm>,
    by_representation: HashMap<(VocabularyKind, String), i64>,
    by_name: HashMap<(VocabularyKind, String), i64>,
    rules: HashMap<String, LanguageRules>,
}

impl Vocabulary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term. A later term with the same representation or name replaces
    /// the earlier one in the string indexes.
    pub fn insert(&mut self, term: VocabularyTerm) {
        let key = (term.kind, term.id);
        self.by_representation
            .insert((term.kind, term.representation.to_lowercase()), term.id);
        self.by_name
            .insert((term.kind, term.name.to_lowercase()), term.id);
        self.terms.insert(key, term);
    }

    /// Builder-style [`insert`](Self::insert).
    #[must_use]
    pub fn with(mut self, term: VocabularyTerm) -> Self {
        self.insert(term);
        self
    }

    pub fn set_language_rules(&mut self, code: &str, rules: LanguageRules) {
        self.rules.insert(code.to_lowercase(), rules);
    }

    /// All terms of one kind, ordered by id.
    #[must_use]
    pub fn terms(&self, kind: VocabularyKind) -> Vec<&VocabularyTerm> {
        let mut terms: Vec<_> = self.terms.values().filter(|t| t.kind == kind).collect();
        terms.sort_by_key(|t| t.id);
        terms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl VocabularyLookup for Vocabulary {
    fn resolve(&self, kind: VocabularyKind, representation: &str) -> Option<&VocabularyTerm> {
        let id = self
            .by_representation
            .get(&(kind, representation.trim().to_lowercase()))?;
        self.terms.get(&(kind, *id))
    }

    fn term(&self, kind: VocabularyKind, id: i64) -> Option<&VocabularyTerm> {
        self.terms.get(&(kind, id))
    }

    fn find_by_name(&self, kind: VocabularyKind, name: &str) -> Option<&VocabularyTerm> {
        let id = self.by_name.get(&(kind, name.trim().to_lowercase()))?;
        self.terms.get(&(kind, *id))
    }

    fn language_rules(&self, code: &str) -> Option<&LanguageRules> {
        self.rules.get(&code.to_lowercase())
    }
}

/// Shorthand constructor used by tests and the seed loader.
#[must_use]
pub fn term(
    kind: VocabularyKind,
    id: i64,
    name: impl Into<String>,
    representation: impl Into<String>,
) -> VocabularyTerm {
    VocabularyTerm {
        kind,
        id,
        name: name.into(),
        representation: representation.into(),
        description: String::new(),
        allows_reason: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vocabulary {
        Vocabulary::new()
            .with(term(VocabularyKind::Language, 1, "English", "en"))
            .with(term(VocabularyKind::PartOfSpeech, 1, "Noun", "noun"))
            .with(term(
                VocabularyKind::AdministrativeStatus,
                1,
                "Preferred",
                "preferredTerm-admn-sts",
            ))
            .with(term(VocabularyKind::GrammaticalGender, 1, "Masculine", "masculine"))
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let vocab = sample();
        let status = vocab
            .resolve(VocabularyKind::AdministrativeStatus, "PreferredTerm-Admn-Sts")
            .unwrap();
        assert_eq!(status.name, "Preferred");
        assert_eq!(vocab.resolve(VocabularyKind::Language, "EN").unwrap().id, 1);
    }

    #[test]
    fn kinds_do_not_collide() {
        let vocab = sample();
        assert!(vocab.resolve(VocabularyKind::PartOfSpeech, "masculine").is_none());
        assert_eq!(
            vocab.term(VocabularyKind::GrammaticalGender, 1).unwrap().name,
            "Masculine"
        );
    }

    #[test]
    fn find_by_name_ignores_case() {
        let vocab = sample();
        assert!(
            vocab
                .find_by_name(VocabularyKind::AdministrativeStatus, "preferred")
                .is_some()
        );
        assert!(
            vocab
                .find_by_name(VocabularyKind::AdministrativeStatus, "Admitted")
                .is_none()
        );
    }

    #[test]
    fn language_rules_keyed_by_lowercase_code() {
        let mut vocab = sample();
        let mut rules = LanguageRules::default();
        rules.grammatical_genders.insert(1);
        vocab.set_language_rules("pt-BR", rules.clone());
        assert_eq!(vocab.language_rules("PT-br"), Some(&rules));
        assert!(vocab.language_rules("es").is_none());
    }
}
