//! Vocabulary kinds, concept relations, and the export tier ladder.
//!
//! All enums serialize with the strings used in config files, SQL storage and
//! CLI output.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// VocabularyKind
// ---------------------------------------------------------------------------

/// A family of controlled terms looked up by TBX representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum VocabularyKind {
    Language,
    PartOfSpeech,
    GrammaticalGender,
    GrammaticalNumber,
    AdministrativeStatus,
    AdministrativeStatusReason,
    ExternalLinkType,
}

impl VocabularyKind {
    pub const ALL: [Self; 7] = [
        Self::Language,
        Self::PartOfSpeech,
        Self::GrammaticalGender,
        Self::GrammaticalNumber,
        Self::AdministrativeStatus,
        Self::AdministrativeStatusReason,
        Self::ExternalLinkType,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::PartOfSpeech => "part_of_speech",
            Self::GrammaticalGender => "grammatical_gender",
            Self::GrammaticalNumber => "grammatical_number",
            Self::AdministrativeStatus => "administrative_status",
            Self::AdministrativeStatusReason => "administrative_status_reason",
            Self::ExternalLinkType => "external_link_type",
        }
    }

    /// Human label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Language => "language",
            Self::PartOfSpeech => "part of speech",
            Self::GrammaticalGender => "grammatical gender",
            Self::GrammaticalNumber => "grammatical number",
            Self::AdministrativeStatus => "administrative status",
            Self::AdministrativeStatusReason => "administrative status reason",
            Self::ExternalLinkType => "external link type",
        }
    }
}

impl fmt::Display for VocabularyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ConceptRelation
// ---------------------------------------------------------------------------

/// The three concept-to-concept relations.
///
/// `SubjectField` and `BroaderConcept` are delete-protected in the store;
/// `RelatedConcept` is a plain symmetric many-to-many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConceptRelation {
    SubjectField,
    BroaderConcept,
    RelatedConcept,
}

impl ConceptRelation {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubjectField => "subject_field",
            Self::BroaderConcept => "broader_concept",
            Self::RelatedConcept => "related_concept",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SubjectField => "subject field",
            Self::BroaderConcept => "broader concept",
            Self::RelatedConcept => "related concept",
        }
    }

    /// Whether the store refuses to delete a concept referenced through this relation.
    #[must_use]
    pub const fn is_delete_protected(self) -> bool {
        matches!(self, Self::SubjectField | Self::BroaderConcept)
    }
}

impl fmt::Display for ConceptRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// StatusTier
// ---------------------------------------------------------------------------

/// Administrative statuses that take part in the export ladder, by vocabulary name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusTier {
    Preferred,
    Admitted,
    NotRecommended,
}

impl StatusTier {
    /// The `name` of the administrative status in the vocabulary.
    #[must_use]
    pub const fn status_name(self) -> &'static str {
        match self {
            Self::Preferred => "Preferred",
            Self::Admitted => "Admitted",
            Self::NotRecommended => "Not recommended",
        }
    }
}

// ---------------------------------------------------------------------------
// ExportTerms
// ---------------------------------------------------------------------------

/// Which translations an export includes.
///
/// ```text
/// all ⊃ preferred+admitted+not_recommended ⊃ preferred+admitted ⊃ preferred
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ExportTerms {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "preferred")]
    Preferred,
    #[serde(rename = "preferred+admitted")]
    PreferredAdmitted,
    #[serde(rename = "preferred+admitted+not_recommended")]
    PreferredAdmittedNotRecommended,
}

impl ExportTerms {
    /// Statuses a translation must carry to be exported, or `None` for no filter.
    ///
    /// Each tier is the previous tier plus one status.
    #[must_use]
    pub const fn included_tiers(self) -> Option<&'static [StatusTier]> {
        match self {
            Self::All => None,
            Self::Preferred => Some(&[StatusTier::Preferred]),
            Self::PreferredAdmitted => Some(&[StatusTier::Preferred, StatusTier::Admitted]),
            Self::PreferredAdmittedNotRecommended => Some(&[
                StatusTier::Preferred,
                StatusTier::Admitted,
                StatusTier::NotRecommended,
            ]),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Preferred => "preferred",
            Self::PreferredAdmitted => "preferred+admitted",
            Self::PreferredAdmittedNotRecommended => "preferred+admitted+not_recommended",
        }
    }
}

impl fmt::Display for ExportTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportTerms {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "preferred" => Ok(Self::Preferred),
            "preferred+admitted" => Ok(Self::PreferredAdmitted),
            "preferred+admitted+not_recommended" => Ok(Self::PreferredAdmittedNotRecommended),
            other => Err(format!(
                "unknown export tier '{other}' (expected all, preferred, preferred+admitted, \
                 preferred+admitted+not_recommended)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        kind_part_of_speech,
        VocabularyKind,
        VocabularyKind::PartOfSpeech,
        "part_of_speech"
    );
    test_serde_roundtrip!(
        relation_broader,
        ConceptRelation,
        ConceptRelation::BroaderConcept,
        "broader_concept"
    );
    test_serde_roundtrip!(
        terms_admitted,
        ExportTerms,
        ExportTerms::PreferredAdmitted,
        "preferred+admitted"
    );

    #[rstest]
    #[case(ExportTerms::All)]
    #[case(ExportTerms::Preferred)]
    #[case(ExportTerms::PreferredAdmitted)]
    #[case(ExportTerms::PreferredAdmittedNotRecommended)]
    fn export_terms_as_str_parses_back(#[case] terms: ExportTerms) {
        assert_eq!(terms.as_str().parse::<ExportTerms>().unwrap(), terms);
    }

    #[test]
    fn export_terms_ladder_is_strictly_increasing() {
        let ladder = [
            ExportTerms::Preferred,
            ExportTerms::PreferredAdmitted,
            ExportTerms::PreferredAdmittedNotRecommended,
        ];
        for pair in ladder.windows(2) {
            let lower = pair[0].included_tiers().unwrap();
            let upper = pair[1].included_tiers().unwrap();
            assert_eq!(upper.len(), lower.len() + 1);
            assert!(lower.iter().all(|tier| upper.contains(tier)));
        }
        assert!(ExportTerms::All.included_tiers().is_none());
    }

    #[test]
    fn unknown_export_terms_rejected() {
        assert!("preferred+deprecated".parse::<ExportTerms>().is_err());
    }

    #[test]
    fn only_subject_and_broader_are_protected() {
        assert!(ConceptRelation::SubjectField.is_delete_protected());
        assert!(ConceptRelation::BroaderConcept.is_delete_protected());
        assert!(!ConceptRelation::RelatedConcept.is_delete_protected());
    }
}
