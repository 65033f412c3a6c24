//! Relationship and attribute rules for concepts, translations and glossaries.
//!
//! The store calls these before writing; the importer calls them while it
//! builds a concept graph. Everything here is pure.

use crate::entities::{ConceptRef, NewGlossary, NewTranslation};
use crate::enums::{ConceptRelation, VocabularyKind};
use crate::errors::ValidationError;
use crate::vocabulary::VocabularyLookup;

/// The three relations of one concept, resolved to concept references.
#[derive(Debug, Clone, Default)]
pub struct ConceptRelations<'a> {
    pub subject_field: Option<ConceptRef>,
    pub broader_concept: Option<ConceptRef>,
    pub related_concepts: &'a [ConceptRef],
}

/// Check that no relation points at the concept itself or outside its glossary.
///
/// # Errors
///
/// Returns the first violation found, checking subject field, broader concept
/// and related concepts in that order.
pub fn validate_concept_relations(
    concept: ConceptRef,
    relations: &ConceptRelations<'_>,
) -> Result<(), ValidationError> {
    let singles = [
        (ConceptRelation::SubjectField, relations.subject_field),
        (ConceptRelation::BroaderConcept, relations.broader_concept),
    ];
    let targets = singles
        .into_iter()
        .filter_map(|(relation, target)| target.map(|t| (relation, t)))
        .chain(
            relations
                .related_concepts
                .iter()
                .map(|t| (ConceptRelation::RelatedConcept, *t)),
        );

    for (relation, target) in targets {
        if target.id == concept.id {
            return Err(ValidationError::SelfReference {
                concept_id: concept.id,
                relation,
            });
        }
        if target.glossary_id != concept.glossary_id {
            return Err(ValidationError::CrossGlossary {
                concept_id: concept.id,
                relation,
                target_id: target.id,
            });
        }
    }
    Ok(())
}

/// Clear gender and number when no part of speech is set.
///
/// Returns `true` if anything was cleared.
pub const fn clear_dangling_grammar(translation: &mut NewTranslation) -> bool {
    if translation.part_of_speech_id.is_some() {
        return false;
    }
    let had_any =
        translation.grammatical_gender_id.is_some() || translation.grammatical_number_id.is_some();
    translation.grammatical_gender_id = None;
    translation.grammatical_number_id = None;
    had_any
}

/// Check a translation's vocabulary attributes.
///
/// Structural rules (grammar needs a part of speech, a reason needs a status
/// that allows one) always apply. When `enforce_language_rules` is set, each
/// attribute must also be allowed for the translation's language.
///
/// # Errors
///
/// Returns a [`ValidationError`] describing the first broken rule.
pub fn validate_translation(
    translation: &NewTranslation,
    vocabulary: &impl VocabularyLookup,
    enforce_language_rules: bool,
) -> Result<(), ValidationError> {
    if translation.part_of_speech_id.is_none() {
        if translation.grammatical_gender_id.is_some() {
            return Err(ValidationError::DanglingGrammar {
                text: translation.text.clone(),
                kind: VocabularyKind::GrammaticalGender,
            });
        }
        if translation.grammatical_number_id.is_some() {
            return Err(ValidationError::DanglingGrammar {
                text: translation.text.clone(),
                kind: VocabularyKind::GrammaticalNumber,
            });
        }
    }

    if translation.administrative_status_reason_id.is_some() {
        let Some(status_id) = translation.administrative_status_id else {
            return Err(ValidationError::DisallowedReason {
                text: translation.text.clone(),
                status: "is not set".to_string(),
            });
        };
        let status = vocabulary
            .term(VocabularyKind::AdministrativeStatus, status_id)
            .ok_or(ValidationError::UnknownVocabularyId {
                kind: VocabularyKind::AdministrativeStatus,
                id: status_id,
            })?;
        if !status.allows_reason {
            return Err(ValidationError::DisallowedReason {
                text: translation.text.clone(),
                status: format!("'{}' does not allow one", status.name),
            });
        }
    }

    if enforce_language_rules {
        check_language_rules(translation, vocabulary)?;
    }
    Ok(())
}

fn check_language_rules(
    translation: &NewTranslation,
    vocabulary: &impl VocabularyLookup,
) -> Result<(), ValidationError> {
    let language = translation.language.as_str();
    let rules = vocabulary.language_rules(language).cloned().unwrap_or_default();

    let not_allowed = |kind: VocabularyKind, id: i64| {
        let value = vocabulary
            .term(kind, id)
            .map_or_else(|| id.to_string(), |t| t.name.clone());
        ValidationError::NotAllowedForLanguage {
            kind,
            value,
            language: language.to_string(),
        }
    };

    let Some(pos) = translation.part_of_speech_id else {
        return check_reason(translation, &rules, not_allowed);
    };
    if !rules.allows_part_of_speech(pos) {
        return Err(not_allowed(VocabularyKind::PartOfSpeech, pos));
    }
    if let Some(gender) = translation.grammatical_gender_id
        && !rules.allows_gender(pos, gender)
    {
        return Err(not_allowed(VocabularyKind::GrammaticalGender, gender));
    }
    if let Some(number) = translation.grammatical_number_id
        && !rules.allows_number(pos, number)
    {
        return Err(not_allowed(VocabularyKind::GrammaticalNumber, number));
    }
    check_reason(translation, &rules, not_allowed)
}

fn check_reason(
    translation: &NewTranslation,
    rules: &crate::entities::LanguageRules,
    not_allowed: impl Fn(VocabularyKind, i64) -> ValidationError,
) -> Result<(), ValidationError> {
    match translation.administrative_status_reason_id {
        Some(reason) if !rules.allows_reason(reason) => Err(not_allowed(
            VocabularyKind::AdministrativeStatusReason,
            reason,
        )),
        _ => Ok(()),
    }
}

/// Check a glossary before it is created.
///
/// # Errors
///
/// Fails if the name is blank, a language is unknown, or the source language is
/// also listed among the other languages.
pub fn validate_glossary(
    glossary: &NewGlossary,
    vocabulary: &impl VocabularyLookup,
) -> Result<(), ValidationError> {
    if glossary.name.trim().is_empty() {
        return Err(ValidationError::Glossary("name must not be empty".into()));
    }
    for code in std::iter::once(&glossary.source_language).chain(&glossary.other_languages) {
        if vocabulary.resolve(VocabularyKind::Language, code).is_none() {
            return Err(ValidationError::Glossary(format!("unknown language '{code}'")));
        }
    }
    if glossary
        .other_languages
        .iter()
        .any(|code| code.eq_ignore_ascii_case(&glossary.source_language))
    {
        return Err(ValidationError::Glossary(format!(
            "source language '{}' can not also be one of the other languages",
            glossary.source_language
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GrammarAllowance, LanguageRules};
    use crate::vocabulary::{Vocabulary, term};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const CONCEPT: ConceptRef = ConceptRef {
        id: 1,
        glossary_id: 10,
    };
    const SIBLING: ConceptRef = ConceptRef {
        id: 2,
        glossary_id: 10,
    };
    const FOREIGN: ConceptRef = ConceptRef {
        id: 3,
        glossary_id: 20,
    };

    fn vocabulary() -> Vocabulary {
        let mut preferred = term(
            VocabularyKind::AdministrativeStatus,
            1,
            "Preferred",
            "preferredTerm-admn-sts",
        );
        preferred.allows_reason = false;
        let mut deprecated = term(
            VocabularyKind::AdministrativeStatus,
            4,
            "Deprecated",
            "deprecatedTerm-admn-sts",
        );
        deprecated.allows_reason = true;
        let mut vocab = Vocabulary::new()
            .with(term(VocabularyKind::Language, 1, "English", "en"))
            .with(term(VocabularyKind::Language, 2, "Spanish", "es"))
            .with(term(VocabularyKind::PartOfSpeech, 1, "Noun", "noun"))
            .with(term(VocabularyKind::PartOfSpeech, 2, "Verb", "verb"))
            .with(term(VocabularyKind::GrammaticalGender, 1, "Masculine", "masculine"))
            .with(term(VocabularyKind::AdministrativeStatusReason, 1, "Archaic", "archaic"))
            .with(preferred)
            .with(deprecated);
        let mut es = LanguageRules::default();
        es.parts_of_speech.insert(
            1,
            GrammarAllowance {
                gender: true,
                number: true,
            },
        );
        es.parts_of_speech.insert(2, GrammarAllowance::default());
        es.grammatical_genders.insert(1);
        vocab.set_language_rules("es", es);
        vocab
    }

    #[rstest]
    #[case::subject(Some(CONCEPT), None, vec![], ConceptRelation::SubjectField)]
    #[case::broader(None, Some(CONCEPT), vec![], ConceptRelation::BroaderConcept)]
    #[case::related(None, None, vec![SIBLING, CONCEPT], ConceptRelation::RelatedConcept)]
    fn self_reference_rejected(
        #[case] subject_field: Option<ConceptRef>,
        #[case] broader_concept: Option<ConceptRef>,
        #[case] related: Vec<ConceptRef>,
        #[case] expected: ConceptRelation,
    ) {
        let relations = ConceptRelations {
            subject_field,
            broader_concept,
            related_concepts: &related,
        };
        assert_eq!(
            validate_concept_relations(CONCEPT, &relations),
            Err(ValidationError::SelfReference {
                concept_id: 1,
                relation: expected,
            })
        );
    }

    #[rstest]
    #[case::subject(Some(FOREIGN), None, vec![], ConceptRelation::SubjectField)]
    #[case::broader(None, Some(FOREIGN), vec![], ConceptRelation::BroaderConcept)]
    #[case::related(None, None, vec![FOREIGN], ConceptRelation::RelatedConcept)]
    fn cross_glossary_rejected(
        #[case] subject_field: Option<ConceptRef>,
        #[case] broader_concept: Option<ConceptRef>,
        #[case] related: Vec<ConceptRef>,
        #[case] expected: ConceptRelation,
    ) {
        let relations = ConceptRelations {
            subject_field,
            broader_concept,
            related_concepts: &related,
        };
        assert_eq!(
            validate_concept_relations(CONCEPT, &relations),
            Err(ValidationError::CrossGlossary {
                concept_id: 1,
                relation: expected,
                target_id: 3,
            })
        );
    }

    #[test]
    fn same_glossary_relations_accepted() {
        let related = [SIBLING];
        let relations = ConceptRelations {
            subject_field: Some(SIBLING),
            broader_concept: Some(SIBLING),
            related_concepts: &related,
        };
        assert_eq!(validate_concept_relations(CONCEPT, &relations), Ok(()));
    }

    #[test]
    fn dangling_grammar_cleared_not_rejected() {
        let mut t = NewTranslation::new(1, "en", "car");
        t.grammatical_gender_id = Some(1);
        t.grammatical_number_id = Some(1);
        assert!(clear_dangling_grammar(&mut t));
        assert_eq!(t.grammatical_gender_id, None);
        assert_eq!(t.grammatical_number_id, None);
        assert_eq!(validate_translation(&t, &vocabulary(), false), Ok(()));
    }

    #[test]
    fn dangling_grammar_rejected_by_validator() {
        let mut t = NewTranslation::new(1, "en", "car");
        t.grammatical_number_id = Some(1);
        assert_eq!(
            validate_translation(&t, &vocabulary(), false),
            Err(ValidationError::DanglingGrammar {
                text: "car".into(),
                kind: VocabularyKind::GrammaticalNumber,
            })
        );
    }

    #[test]
    fn reason_requires_status_allowing_it() {
        let vocab = vocabulary();
        let mut t = NewTranslation::new(1, "en", "motorcar");
        t.administrative_status_reason_id = Some(1);
        assert!(matches!(
            validate_translation(&t, &vocab, false),
            Err(ValidationError::DisallowedReason { .. })
        ));

        t.administrative_status_id = Some(1);
        assert!(matches!(
            validate_translation(&t, &vocab, false),
            Err(ValidationError::DisallowedReason { .. })
        ));

        t.administrative_status_id = Some(4);
        assert_eq!(validate_translation(&t, &vocab, false), Ok(()));
    }

    #[test]
    fn language_rules_only_checked_when_enforced() {
        let vocab = vocabulary();
        let mut t = NewTranslation::new(1, "es", "correr");
        t.part_of_speech_id = Some(2);
        t.grammatical_gender_id = Some(1);
        assert_eq!(validate_translation(&t, &vocab, false), Ok(()));
        assert_eq!(
            validate_translation(&t, &vocab, true),
            Err(ValidationError::NotAllowedForLanguage {
                kind: VocabularyKind::GrammaticalGender,
                value: "Masculine".into(),
                language: "es".into(),
            })
        );

        t.part_of_speech_id = Some(1);
        assert_eq!(validate_translation(&t, &vocab, true), Ok(()));
    }

    #[test]
    fn language_without_rules_allows_nothing_when_enforced() {
        let mut t = NewTranslation::new(1, "en", "car");
        t.part_of_speech_id = Some(1);
        assert!(matches!(
            validate_translation(&t, &vocabulary(), true),
            Err(ValidationError::NotAllowedForLanguage {
                kind: VocabularyKind::PartOfSpeech,
                ..
            })
        ));
    }

    #[test]
    fn glossary_source_language_not_in_other_languages() {
        let vocab = vocabulary();
        let ok = NewGlossary::new("Cars", "en").other_languages(["es"]);
        assert_eq!(validate_glossary(&ok, &vocab), Ok(()));

        let clash = NewGlossary::new("Cars", "en").other_languages(["es", "EN"]);
        assert!(matches!(
            validate_glossary(&clash, &vocab),
            Err(ValidationError::Glossary(_))
        ));

        let unknown = NewGlossary::new("Cars", "xx");
        assert!(validate_glossary(&unknown, &vocab).is_err());
    }
}
