use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The definition of a concept in one language. At most one per (concept, language).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Definition {
    pub id: i64,
    pub concept_id: i64,
    pub language: String,
    pub text: String,
    pub finalized: bool,
    pub source: Option<String>,
}

/// Fields needed to create a definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewDefinition {
    pub concept_id: i64,
    pub language: String,
    pub text: String,
    pub finalized: bool,
    pub source: Option<String>,
}

/// One append-only record of a definition's content at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct DefinitionHistoryEntry {
    pub id: i64,
    pub definition_id: i64,
    pub text: String,
    pub finalized: bool,
    pub source: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
