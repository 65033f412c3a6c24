use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A named collection of concepts. Owns every concept and, transitively, their children.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Glossary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub source_language: String,
    pub other_languages: Vec<String>,
    pub subscribers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to create a glossary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewGlossary {
    pub name: String,
    pub description: String,
    pub source_language: String,
    #[serde(default)]
    pub other_languages: Vec<String>,
}

impl NewGlossary {
    #[must_use]
    pub fn new(name: impl Into<String>, source_language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            source_language: source_language.into(),
            other_languages: Vec::new(),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn other_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.other_languages = languages.into_iter().map(Into::into).collect();
        self
    }
}
