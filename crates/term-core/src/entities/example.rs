use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A sentence showing a translation in context. Unique per (translation, text).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContextSentence {
    pub id: i64,
    pub translation_id: i64,
    pub text: String,
}

/// A pointer to a corpus occurrence of a translation. Unique per (translation, address).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CorpusExample {
    pub id: i64,
    pub translation_id: i64,
    pub address: String,
    pub description: String,
}
