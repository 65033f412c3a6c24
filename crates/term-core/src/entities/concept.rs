use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One concept in a glossary, with its three concept-to-concept relations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Concept {
    pub id: i64,
    pub glossary_id: i64,
    pub subject_field_id: Option<i64>,
    pub broader_concept_id: Option<i64>,
    pub related_concept_ids: Vec<i64>,
    /// Human-readable form, recomputed whenever the concept's translations change.
    pub repr_cache: Option<String>,
}

impl Concept {
    #[must_use]
    pub const fn reference(&self) -> ConceptRef {
        ConceptRef {
            id: self.id,
            glossary_id: self.glossary_id,
        }
    }
}

/// Identity plus owning glossary: all the validator needs to check a relation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub struct ConceptRef {
    pub id: i64,
    pub glossary_id: i64,
}
