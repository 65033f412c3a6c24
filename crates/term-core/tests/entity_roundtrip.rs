//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use chrono::Utc;
use schemars::schema_for;
use term_core::entities::*;
use term_core::enums::*;
use term_core::responses::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn glossary() -> Glossary {
    Glossary {
        id: 1,
        name: "Automotive".into(),
        description: "Car parts and maintenance".into(),
        source_language: "en".into(),
        other_languages: vec!["es".into(), "pt-BR".into()],
        subscribers: vec!["maria".into()],
        created_at: Utc::now(),
    }
}

roundtrip_and_validate!(glossary_roundtrip, Glossary, glossary());

roundtrip_and_validate!(
    concept_roundtrip,
    Concept,
    Concept {
        id: 12,
        glossary_id: 1,
        subject_field_id: Some(3),
        broader_concept_id: None,
        related_concept_ids: vec![4, 9],
        repr_cache: Some("#12: brake pad, brake lining".into()),
    }
);

roundtrip_and_validate!(
    translation_roundtrip,
    Translation,
    Translation {
        id: 40,
        concept_id: 12,
        language: "es".into(),
        text: "pastilla de freno".into(),
        part_of_speech_id: Some(1),
        grammatical_gender_id: Some(2),
        grammatical_number_id: Some(1),
        administrative_status_id: Some(1),
        administrative_status_reason_id: None,
        note: Some("Used in Spain".into()),
        finalized: true,
    }
);

roundtrip_and_validate!(
    definition_roundtrip,
    Definition,
    Definition {
        id: 5,
        concept_id: 12,
        language: "en".into(),
        text: "Friction material pressed against the disc.".into(),
        finalized: true,
        source: Some("https://example.org/brakes".into()),
    }
);

roundtrip_and_validate!(
    definition_history_roundtrip,
    DefinitionHistoryEntry,
    DefinitionHistoryEntry {
        id: 1,
        definition_id: 5,
        text: "Friction material.".into(),
        finalized: false,
        source: None,
        recorded_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    resource_roundtrip,
    ExternalResource,
    ExternalResource {
        id: 2,
        concept_id: 12,
        language: None,
        address: "https://example.org/diagram.png".into(),
        link_type_id: 3,
        description: "Exploded diagram".into(),
    }
);

roundtrip_and_validate!(
    context_sentence_roundtrip,
    ContextSentence,
    ContextSentence {
        id: 1,
        translation_id: 40,
        text: "Replace the brake pads every 40,000 km.".into(),
    }
);

roundtrip_and_validate!(
    corpus_example_roundtrip,
    CorpusExample,
    CorpusExample {
        id: 1,
        translation_id: 40,
        address: "https://corpus.example.org/doc/17".into(),
        description: "Workshop manual".into(),
    }
);

roundtrip_and_validate!(
    concept_in_language_roundtrip,
    ConceptInLanguage,
    ConceptInLanguage {
        id: 3,
        concept_id: 12,
        language: "es".into(),
        summary: "Agreed with the translation team".into(),
        finalized: true,
        updated_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    vocabulary_term_roundtrip,
    VocabularyTerm,
    VocabularyTerm {
        kind: VocabularyKind::AdministrativeStatus,
        id: 4,
        name: "Deprecated".into(),
        representation: "deprecatedTerm-admn-sts".into(),
        description: String::new(),
        allows_reason: true,
    }
);

roundtrip_and_validate!(
    import_response_roundtrip,
    ImportResponse,
    ImportResponse {
        glossary: glossary(),
        counts: ImportCounts {
            concepts: 3,
            translations: 7,
            definitions: 2,
            external_resources: 1,
            context_sentences: 0,
            corpus_examples: 1,
            relations: 2,
        },
        duration_ms: 18,
    }
);

roundtrip_and_validate!(
    export_response_roundtrip,
    ExportResponse,
    ExportResponse {
        glossary_ids: vec![1],
        name: "Automotive".into(),
        filename: "Automotive.tbx".into(),
        path: "./Automotive.tbx".into(),
        content_type: "application/x-tbx".into(),
        terms: ExportTerms::PreferredAdmitted,
        languages: vec!["en".into(), "es".into()],
        concepts: 3,
        duration_ms: 4,
    }
);

// --- Schema rejection tests ---

#[test]
fn schema_rejects_translation_without_text() {
    let schema = serde_json::to_value(schema_for!(Translation)).unwrap();
    let invalid = serde_json::json!({
        "id": 1,
        "concept_id": 1,
        "language": "en",
        "finalized": false
    });
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject translation without 'text'");
}

#[test]
fn schema_rejects_unknown_export_tier() {
    let schema = serde_json::to_value(schema_for!(ExportResponse)).unwrap();
    let invalid = serde_json::json!({
        "glossary_ids": [1],
        "name": "Automotive",
        "filename": "Automotive.tbx",
        "path": "Automotive.tbx",
        "content_type": "application/x-tbx",
        "terms": "preferred+deprecated",
        "languages": [],
        "concepts": 0,
        "duration_ms": 0
    });
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "Should reject unknown export tier");
}
