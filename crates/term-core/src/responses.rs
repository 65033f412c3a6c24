//! Response types returned as JSON by `termbase` commands.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Glossary, VocabularyTerm};
use crate::enums::{ExportTerms, VocabularyKind};

/// Number of entities written by one import.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportCounts {
    pub concepts: u32,
    pub translations: u32,
    pub definitions: u32,
    pub external_resources: u32,
    pub context_sentences: u32,
    pub corpus_examples: u32,
    pub relations: u32,
}

/// Response from `termbase import`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ImportResponse {
    pub glossary: Glossary,
    pub counts: ImportCounts,
    pub duration_ms: u64,
}

/// Response from `termbase export`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExportResponse {
    pub glossary_ids: Vec<i64>,
    pub name: String,
    pub filename: String,
    pub path: String,
    pub content_type: String,
    pub terms: ExportTerms,
    pub languages: Vec<String>,
    pub concepts: u32,
    pub duration_ms: u64,
}

/// Response from `termbase glossary list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GlossaryListResponse {
    pub glossaries: Vec<GlossarySummary>,
}

/// A glossary plus its concept count.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GlossarySummary {
    pub glossary: Glossary,
    pub concepts: u32,
}

/// Response from `termbase glossary delete`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GlossaryDeleteResponse {
    pub id: i64,
    pub deleted: bool,
}

/// Response from `termbase vocab seed`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VocabularySeedResponse {
    pub source: String,
    pub inserted: u32,
}

/// Response from `termbase vocab list`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VocabularyListResponse {
    pub kind: VocabularyKind,
    pub terms: Vec<VocabularyTerm>,
}

/// Response from `termbase init`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InitResponse {
    pub database: String,
    pub config: Option<String>,
    pub seeded: u32,
}
