use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A term for a concept in one language.
///
/// Vocabulary attributes are stored as vocabulary ids; the language is stored
/// by its code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Translation {
    pub id: i64,
    pub concept_id: i64,
    pub language: String,
    pub text: String,
    pub part_of_speech_id: Option<i64>,
    pub grammatical_gender_id: Option<i64>,
    pub grammatical_number_id: Option<i64>,
    pub administrative_status_id: Option<i64>,
    pub administrative_status_reason_id: Option<i64>,
    pub note: Option<String>,
    pub finalized: bool,
}

/// Fields needed to create a translation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewTranslation {
    pub concept_id: i64,
    pub language: String,
    pub text: String,
    pub part_of_speech_id: Option<i64>,
    pub grammatical_gender_id: Option<i64>,
    pub grammatical_number_id: Option<i64>,
    pub administrative_status_id: Option<i64>,
    pub administrative_status_reason_id: Option<i64>,
    pub note: Option<String>,
    pub finalized: bool,
}

impl NewTranslation {
    #[must_use]
    pub fn new(concept_id: i64, language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            concept_id,
            language: language.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    /// Attach the identity assigned by the store.
    #[must_use]
    pub fn into_translation(self, id: i64) -> Translation {
        Translation {
            id,
            concept_id: self.concept_id,
            language: self.language,
            text: self.text,
            part_of_speech_id: self.part_of_speech_id,
            grammatical_gender_id: self.grammatical_gender_id,
            grammatical_number_id: self.grammatical_number_id,
            administrative_status_id: self.administrative_status_id,
            administrative_status_reason_id: self.administrative_status_reason_id,
            note: self.note,
            finalized: self.finalized,
        }
    }
}
