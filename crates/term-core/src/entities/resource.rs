use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A link to an external resource about a concept.
///
/// `language == None` marks a concept-level resource.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExternalResource {
    pub id: i64,
    pub concept_id: i64,
    pub language: Option<String>,
    pub address: String,
    pub link_type_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewExternalResource {
    pub concept_id: i64,
    pub language: Option<String>,
    pub address: String,
    pub link_type_id: i64,
    pub description: String,
}
