//! Cross-cutting error types for termbase.
//!
//! Domain-specific errors (`DatabaseError`, `ImportError`, ...) live in their
//! respective crates. `ValidationError` is defined here because both the store
//! and the TBX importer apply the same rules.

use thiserror::Error;

use crate::enums::{ConceptRelation, VocabularyKind};

/// Errors that can be raised by any termbase crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A relationship or attribute rule was violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A concept relation points at the concept itself.
    #[error("Concept {concept_id} can not use itself as its {relation}")]
    SelfReference {
        concept_id: i64,
        relation: ConceptRelation,
    },

    /// A concept relation points at a concept in another glossary.
    #[error(
        "Concept {concept_id} uses concept {target_id} from another glossary as its {relation}"
    )]
    CrossGlossary {
        concept_id: i64,
        relation: ConceptRelation,
        target_id: i64,
    },

    /// Gender or number set without a part of speech.
    #[error("Translation '{text}' sets a {kind} without a part of speech")]
    DanglingGrammar { text: String, kind: VocabularyKind },

    /// Administrative status reason set without a status that allows one.
    #[error("Translation '{text}' sets an administrative status reason but its status {status}")]
    DisallowedReason { text: String, status: String },

    /// A vocabulary term is not allowed for the translation's language.
    #[error("{kind} '{value}' is not allowed for language '{language}'")]
    NotAllowedForLanguage {
        kind: VocabularyKind,
        value: String,
        language: String,
    },

    /// A vocabulary id stored on an entity does not exist in the registry.
    #[error("Unknown {kind} id {id}")]
    UnknownVocabularyId { kind: VocabularyKind, id: i64 },

    /// Glossary-level rule violation (languages, name).
    #[error("Invalid glossary: {0}")]
    Glossary(String),
}
