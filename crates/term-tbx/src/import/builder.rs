//! Concept graph builder.
//!
//! Phase 1 persists each [`ConceptDraft`] as it is extracted and records the
//! concept in an arena keyed by `termEntry` id. Phase 2 resolves every pending
//! relation against that arena and applies it through the store, which
//! validates self-references and glossary boundaries.

use std::collections::HashMap;

use term_core::entities::{NewDefinition, NewExternalResource};
use term_core::enums::ConceptRelation;
use term_core::responses::ImportCounts;
use term_core::vocabulary::VocabularyLookup;
use term_db::repos::concept::ConceptRelationsUpdate;
use term_db::service::TermService;
use tracing::debug;

use super::extract::{ConceptDraft, PendingRelations, ResourceDraft};
use crate::error::ImportError;

struct ArenaEntry {
    key: String,
    concept_id: i64,
    relations: PendingRelations,
}

pub struct GraphBuilder<'a, V> {
    service: &'a TermService,
    vocabulary: &'a V,
    glossary_id: i64,
    /// termEntry id -> index into `entries`.
    arena: HashMap<String, usize>,
    /// Document order.
    entries: Vec<ArenaEntry>,
    counts: ImportCounts,
}

impl<'a, V: VocabularyLookup> GraphBuilder<'a, V> {
    pub fn new(service: &'a TermService, vocabulary: &'a V, glossary_id: i64) -> Self {
        Self {
            service,
            vocabulary,
            glossary_id,
            arena: HashMap::new(),
            entries: Vec::new(),
            counts: ImportCounts::default(),
        }
    }

    /// # Errors
    ///
    /// Returns `ImportError::DuplicateId` if a concept with this key was
    /// already added.
    pub fn ensure_unique(&self, key: &str) -> Result<(), ImportError> {
        if self.arena.contains_key(key) {
            return Err(ImportError::DuplicateId(key.to_string()));
        }
        Ok(())
    }

    /// Phase 1: create the concept and all of its children.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::DuplicateId` for a key seen before, and any store
    /// or validation error raised while writing.
    pub async fn add_concept(&mut self, draft: ConceptDraft) -> Result<i64, ImportError> {
        self.ensure_unique(&draft.key)?;
        let concept = self.service.create_concept(self.glossary_id).await?;
        self.arena.insert(draft.key.clone(), self.entries.len());
        self.entries.push(ArenaEntry {
            key: draft.key.clone(),
            concept_id: concept.id,
            relations: draft.relations,
        });
        self.counts.concepts += 1;

        self.add_resources(concept.id, None, draft.concept_resources)
            .await?;

        for lang in draft.languages {
            if let Some(definition) = lang.definition {
                self.service
                    .create_definition(&NewDefinition {
                        concept_id: concept.id,
                        language: lang.language.clone(),
                        text: definition.text,
                        finalized: true,
                        source: definition.source,
                    })
                    .await?;
                self.counts.definitions += 1;
            }

            self.add_resources(concept.id, Some(&lang.language), lang.resources)
                .await?;

            for term in lang.translations {
                let mut new = term.translation;
                new.concept_id = concept.id;
                let translation = self
                    .service
                    .create_translation(&new, self.vocabulary)
                    .await?;
                self.counts.translations += 1;

                for sentence in &term.context_sentences {
                    if self
                        .service
                        .add_context_sentence(translation.id, sentence)
                        .await?
                    {
                        self.counts.context_sentences += 1;
                    }
                }
                for example in &term.corpus_examples {
                    if self
                        .service
                        .add_corpus_example(translation.id, &example.address, &example.description)
                        .await?
                    {
                        self.counts.corpus_examples += 1;
                    }
                }
            }
        }

        debug!(key = %draft.key, concept_id = concept.id, "concept created");
        Ok(concept.id)
    }

    async fn add_resources(
        &mut self,
        concept_id: i64,
        language: Option<&str>,
        resources: Vec<ResourceDraft>,
    ) -> Result<(), ImportError> {
        for resource in resources {
            self.service
                .create_external_resource(&NewExternalResource {
                    concept_id,
                    language: language.map(str::to_string),
                    address: resource.address,
                    link_type_id: resource.link_type_id,
                    description: resource.description,
                })
                .await?;
            self.counts.external_resources += 1;
        }
        Ok(())
    }

    /// Phase 2: resolve every pending relation and apply it, in document order.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::UnresolvedConceptReference` for the first key
    /// that names no `termEntry`, and `ImportError::Validation` for a relation
    /// the validator rejects.
    pub async fn wire_relations(&mut self) -> Result<(), ImportError> {
        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            if entry.relations.is_empty() {
                continue;
            }
            let (concept_id, update) = self.resolve(entry)?;
            let links = u32::from(update.subject_field_id.is_some())
                + u32::from(update.broader_concept_id.is_some())
                + u32::try_from(update.related_concept_ids.len()).unwrap_or(u32::MAX);

            self.service.set_concept_relations(concept_id, &update).await?;
            self.counts.relations += links;
            debug!(key = %self.entries[index].key, concept_id, links, "concept relations wired");
        }
        Ok(())
    }

    fn resolve(&self, entry: &ArenaEntry) -> Result<(i64, ConceptRelationsUpdate), ImportError> {
        let lookup = |relation: ConceptRelation, key: &str| {
            self.arena
                .get(key)
                .map(|index| self.entries[*index].concept_id)
                .ok_or_else(|| ImportError::UnresolvedConceptReference {
                    concept_id: entry.key.clone(),
                    relation,
                    missing_key: key.to_string(),
                })
        };

        let mut update = ConceptRelationsUpdate::new();
        if let Some(key) = &entry.relations.subject_key {
            update = update.subject_field(lookup(ConceptRelation::SubjectField, key)?);
        }
        if let Some(key) = &entry.relations.broader_key {
            update = update.broader_concept(lookup(ConceptRelation::BroaderConcept, key)?);
        }
        let related = entry
            .relations
            .related_keys
            .iter()
            .map(|key| lookup(ConceptRelation::RelatedConcept, key))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((entry.concept_id, update.related(related)))
    }

    /// Ids of every concept created so far, in document order.
    #[must_use]
    pub fn created_concept_ids(&self) -> Vec<i64> {
        self.entries.iter().map(|e| e.concept_id).collect()
    }

    #[must_use]
    pub const fn counts(&self) -> ImportCounts {
        self.counts
    }
}
