use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Per-language state of a concept: the summary message and whether it is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ConceptInLanguage {
    pub id: i64,
    pub concept_id: i64,
    pub language: String,
    pub summary: String,
    pub finalized: bool,
    pub updated_at: DateTime<Utc>,
}
