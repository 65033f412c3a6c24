use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::VocabularyKind;

/// One controlled term (a language, part of speech, status, link type, ...).
///
/// `representation` is the TBX string the term is looked up by; for languages
/// it is the language code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct VocabularyTerm {
    pub kind: VocabularyKind,
    pub id: i64,
    pub name: String,
    pub representation: String,
    #[serde(default)]
    pub description: String,
    /// Only meaningful for administrative statuses.
    #[serde(default)]
    pub allows_reason: bool,
}

/// Whether a part of speech takes gender and number in a given language.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct GrammarAllowance {
    pub gender: bool,
    pub number: bool,
}

/// The vocabulary subsets a language allows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct LanguageRules {
    pub parts_of_speech: BTreeMap<i64, GrammarAllowance>,
    pub grammatical_genders: BTreeSet<i64>,
    pub grammatical_numbers: BTreeSet<i64>,
    pub administrative_status_reasons: BTreeSet<i64>,
}

impl LanguageRules {
    #[must_use]
    pub fn allows_part_of_speech(&self, part_of_speech_id: i64) -> bool {
        self.parts_of_speech.contains_key(&part_of_speech_id)
    }

    /// Gender is allowed only if the part of speech takes gender in this language
    /// and the language knows the gender.
    #[must_use]
    pub fn allows_gender(&self, part_of_speech_id: i64, gender_id: i64) -> bool {
        self.parts_of_speech
            .get(&part_of_speech_id)
            .is_some_and(|allowance| allowance.gender)
            && self.grammatical_genders.contains(&gender_id)
    }

    #[must_use]
    pub fn allows_number(&self, part_of_speech_id: i64, number_id: i64) -> bool {
        self.parts_of_speech
            .get(&part_of_speech_id)
            .is_some_and(|allowance| allowance.number)
            && self.grammatical_numbers.contains(&number_id)
    }

    #[must_use]
    pub fn allows_reason(&self, reason_id: i64) -> bool {
        self.administrative_status_reasons.contains(&reason_id)
    }
}
