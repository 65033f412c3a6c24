//! Export grouping engine.
//!
//! Takes the rows of a glossary set, filters them, indexes them by
//! (concept, language) and turns each concept into a [`ConceptBundle`].
//! Dictionaries are consumed as bundles are produced, so a concept can only
//! be bundled once.

use std::collections::{BTreeSet, HashMap, HashSet};

use term_core::entities::{
    Concept, ConceptInLanguage, ContextSentence, CorpusExample, Definition, ExternalResource,
    Translation,
};
use term_core::enums::{ExportTerms, VocabularyKind};
use term_core::vocabulary::VocabularyLookup;
use term_db::repos::export::ExportConcept;
use tracing::warn;

/// What to export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Languages removed from the detected language set.
    pub desired_languages: Vec<String>,
    pub include_unfinalized_definitions: bool,
    pub terms: ExportTerms,
}

/// Every row an export may draw from, unfiltered.
#[derive(Debug, Clone, Default)]
pub struct ExportRows {
    pub translations: Vec<Translation>,
    pub definitions: Vec<Definition>,
    pub resources: Vec<ExternalResource>,
    pub summaries: Vec<ConceptInLanguage>,
    pub context_sentences: Vec<ContextSentence>,
    pub corpus_examples: Vec<CorpusExample>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTranslation {
    pub translation: Translation,
    pub context_sentences: Vec<ContextSentence>,
    pub corpus_examples: Vec<CorpusExample>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageBundle {
    pub language: String,
    pub translations: Vec<ExportTranslation>,
    pub external_resources: Vec<ExternalResource>,
    /// The definition with the largest id.
    pub definition: Option<Definition>,
    pub summary: Option<ConceptInLanguage>,
}

impl LanguageBundle {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
            && self.external_resources.is_empty()
            && self.definition.is_none()
            && self.summary.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptBundle {
    pub concept: Concept,
    pub subject_field_label: Option<String>,
    /// Resources not tied to a language.
    pub concept_resources: Vec<ExternalResource>,
    /// Non-empty bundles, in used-language order.
    pub languages: Vec<LanguageBundle>,
}

type LangKey = (i64, String);

pub struct GroupingEngine {
    used_languages: Vec<String>,
    translations: HashMap<LangKey, Vec<ExportTranslation>>,
    definitions: HashMap<LangKey, Definition>,
    resources: HashMap<(i64, Option<String>), Vec<ExternalResource>>,
    summaries: HashMap<LangKey, ConceptInLanguage>,
}

impl GroupingEngine {
    /// Filter and index `rows`.
    ///
    /// Translations are kept when their administrative status is in the
    /// tier; definitions when finalized, or always with
    /// `include_unfinalized_definitions`; summaries only when finalized.
    #[must_use]
    pub fn new(rows: ExportRows, options: &ExportOptions, vocabulary: &impl VocabularyLookup) -> Self {
        let status_filter = status_filter(options.terms, vocabulary);
        let translations: Vec<_> = rows
            .translations
            .into_iter()
            .filter(|t| {
                status_filter.as_ref().is_none_or(|allowed| {
                    t.administrative_status_id
                        .is_some_and(|id| allowed.contains(&id))
                })
            })
            .collect();
        let definitions: Vec<_> = rows
            .definitions
            .into_iter()
            .filter(|d| options.include_unfinalized_definitions || d.finalized)
            .collect();

        let desired: HashSet<String> = options
            .desired_languages
            .iter()
            .map(|code| code.to_lowercase())
            .collect();
        let used_languages = translations
            .iter()
            .map(|t| t.language.as_str())
            .chain(definitions.iter().map(|d| d.language.as_str()))
            .filter(|code| !desired.contains(&code.to_lowercase()))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut sentences: HashMap<i64, Vec<ContextSentence>> = HashMap::new();
        for sentence in rows.context_sentences {
            sentences.entry(sentence.translation_id).or_default().push(sentence);
        }
        let mut examples: HashMap<i64, Vec<CorpusExample>> = HashMap::new();
        for example in rows.corpus_examples {
            examples.entry(example.translation_id).or_default().push(example);
        }

        let mut by_lang: HashMap<LangKey, Vec<ExportTranslation>> = HashMap::new();
        for translation in translations {
            let id = translation.id;
            by_lang
                .entry((translation.concept_id, translation.language.clone()))
                .or_default()
                .push(ExportTranslation {
                    translation,
                    context_sentences: sentences.remove(&id).unwrap_or_default(),
                    corpus_examples: examples.remove(&id).unwrap_or_default(),
                });
        }

        let mut latest: HashMap<LangKey, Definition> = HashMap::new();
        for definition in definitions {
            let key = (definition.concept_id, definition.language.clone());
            match latest.get(&key) {
                Some(current) if current.id >= definition.id => {}
                _ => {
                    latest.insert(key, definition);
                }
            }
        }

        let mut resources: HashMap<(i64, Option<String>), Vec<ExternalResource>> = HashMap::new();
        for resource in rows.resources {
            resources
                .entry((resource.concept_id, resource.language.clone()))
                .or_default()
                .push(resource);
        }

        let summaries = rows
            .summaries
            .into_iter()
            .filter(|s| s.finalized)
            .map(|s| ((s.concept_id, s.language.clone()), s))
            .collect();

        Self {
            used_languages,
            translations: by_lang,
            definitions: latest,
            resources,
            summaries,
        }
    }

    /// Languages that get a bundle, sorted.
    #[must_use]
    pub fn used_languages(&self) -> &[String] {
        &self.used_languages
    }

    /// Bundle one concept, or `None` if none of its language bundles has
    /// content.
    pub fn bundle(&mut self, concept: ExportConcept) -> Option<ConceptBundle> {
        let id = concept.concept.id;
        let mut languages = Vec::new();
        for language in &self.used_languages {
            let key = (id, language.clone());
            let bundle = LanguageBundle {
                language: language.clone(),
                translations: self.translations.remove(&key).unwrap_or_default(),
                external_resources: self
                    .resources
                    .remove(&(id, Some(language.clone())))
                    .unwrap_or_default(),
                definition: self.definitions.remove(&key),
                summary: self.summaries.remove(&key),
            };
            if !bundle.is_empty() {
                languages.push(bundle);
            }
        }
        let concept_resources = self.resources.remove(&(id, None)).unwrap_or_default();
        if languages.is_empty() {
            return None;
        }
        Some(ConceptBundle {
            concept: concept.concept,
            subject_field_label: concept.subject_field_label,
            concept_resources,
            languages,
        })
    }

    /// Lazily bundle `concepts` in order, skipping empty ones.
    pub fn bundles<I>(self, concepts: I) -> Bundles<I::IntoIter>
    where
        I: IntoIterator<Item = ExportConcept>,
    {
        Bundles {
            engine: self,
            concepts: concepts.into_iter(),
        }
    }
}

/// Status ids allowed by a tier, or `None` for no filtering. Status names
/// missing from the vocabulary are logged and match nothing.
fn status_filter(terms: ExportTerms, vocabulary: &impl VocabularyLookup) -> Option<HashSet<i64>> {
    let tiers = terms.included_tiers()?;
    let mut allowed = HashSet::new();
    for tier in tiers {
        match vocabulary.find_by_name(VocabularyKind::AdministrativeStatus, tier.status_name()) {
            Some(status) => {
                allowed.insert(status.id);
            }
            None => warn!(
                status = tier.status_name(),
                terms = %terms,
                "administrative status missing from vocabulary, tier matches nothing for it"
            ),
        }
    }
    Some(allowed)
}

/// Single-pass iterator returned by [`GroupingEngine::bundles`].
pub struct Bundles<I> {
    engine: GroupingEngine,
    concepts: I,
}

impl<I: Iterator<Item = ExportConcept>> Iterator for Bundles<I> {
    type Item = ConceptBundle;

    fn next(&mut self) -> Option<Self::Item> {
        self.concepts
            .by_ref()
            .find_map(|concept| self.engine.bundle(concept))
    }
}
