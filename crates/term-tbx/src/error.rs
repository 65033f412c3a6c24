//! Error types for TBX import and export.
//!
//! Import errors name the offending `termEntry` id (as written in the
//! document) so the source file can be fixed.

use term_core::enums::{ConceptRelation, VocabularyKind};
use term_core::errors::ValidationError;
use term_db::error::DatabaseError;

/// Errors that abort an import. Nothing written by the import survives any of them.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("More than one termEntry has the id '{0}'")]
    DuplicateId(String),

    #[error("<{tag}> without the '{attribute}' attribute{}", in_concept(.concept_id.as_deref()))]
    MissingRequiredAttribute {
        tag: &'static str,
        attribute: &'static str,
        concept_id: Option<String>,
    },

    #[error("Language '{code}' in concept '{concept_id}' does not exist")]
    UnknownLanguage { code: String, concept_id: String },

    #[error("Unknown {kind} '{value}' in concept '{concept_id}'{}", in_language(.language.as_deref()))]
    UnknownVocabularyTerm {
        kind: VocabularyKind,
        value: String,
        concept_id: String,
        language: Option<String>,
    },

    #[error("Invalid TBX structure: {0}")]
    StructuralError(String),

    #[error("Concept '{concept_id}' uses '{missing_key}' as its {relation}, but no termEntry has that id")]
    UnresolvedConceptReference {
        concept_id: String,
        relation: ConceptRelation,
        missing_key: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("TBX document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("A glossary named '{0}' already exists")]
    GlossaryNameTaken(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ImportError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::Validation(e) => Self::Validation(e),
            other => Self::Database(other),
        }
    }
}

fn in_concept(concept_id: Option<&str>) -> String {
    concept_id.map_or_else(String::new, |id| format!(" in concept '{id}'"))
}

fn in_language(language: Option<&str>) -> String {
    language.map_or_else(String::new, |code| format!(" for language '{code}'"))
}

/// Errors from exporting glossaries.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("No glossaries selected for export")]
    NoGlossaries,

    #[error("Glossary {0} not found")]
    UnknownGlossary(i64),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
