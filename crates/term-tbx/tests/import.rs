//! TBX import against an in-memory store.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use term_core::entities::{NewGlossary, NewTranslation};
use term_core::enums::{ConceptRelation, VocabularyKind};
use term_core::errors::ValidationError;
use term_core::responses::ImportCounts;
use term_core::vocabulary::VocabularyLookup;
use term_db::service::TermService;
use term_db::test_support::seeded_memory_service;
use term_tbx::{ImportError, Importer};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn tbx(body: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<martif type="TBX" xml:lang="en"><martifHeader/><text><body>{body}</body></text></martif>"#
    )
    .into_bytes()
}

fn glossary(name: &str) -> NewGlossary {
    NewGlossary::new(name, "en").other_languages(["es"])
}

async fn glossary_names(svc: &TermService) -> Vec<String> {
    svc.list_glossaries()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.name)
        .collect()
}

#[tokio::test]
async fn imports_fixture_into_new_glossary() {
    let svc = seeded_memory_service().await.unwrap();
    let response = Importer::new(&svc)
        .import_path(
            &glossary("Automotive").description("Brakes"),
            &fixture("automotive.tbx"),
        )
        .await
        .unwrap();

    assert_eq!(response.glossary.name, "Automotive");
    assert_eq!(response.glossary.description, "Brakes");
    assert_eq!(
        response.counts,
        ImportCounts {
            concepts: 4,
            translations: 11,
            definitions: 3,
            external_resources: 2,
            context_sentences: 2,
            corpus_examples: 1,
            relations: 6,
        }
    );

    let concepts = svc.list_concepts(response.glossary.id).await.unwrap();
    assert_eq!(concepts.len(), 4);
    let (vehicles, brake, abs, device) = (&concepts[0], &concepts[1], &concepts[2], &concepts[3]);

    assert_eq!(brake.subject_field_id, Some(vehicles.id));
    assert_eq!(brake.broader_concept_id, Some(device.id));
    assert_eq!(brake.related_concept_ids, vec![abs.id]);
    assert_eq!(abs.related_concept_ids, vec![brake.id]);
    assert_eq!(device.subject_field_id, Some(vehicles.id));
    assert_eq!(vehicles.subject_field_id, None);

    assert_eq!(
        brake.repr_cache.as_deref(),
        Some(format!("#{}: brake, brake system", brake.id).as_str())
    );
}

#[tokio::test]
async fn imported_children_keep_their_attributes() {
    let svc = seeded_memory_service().await.unwrap();
    let vocab = svc.load_vocabulary().await.unwrap();
    let response = Importer::new(&svc)
        .import_path(&glossary("Automotive"), &fixture("automotive.tbx"))
        .await
        .unwrap();
    let brake = &svc.list_concepts(response.glossary.id).await.unwrap()[1];

    let translations = svc.list_translations(brake.id).await.unwrap();
    let texts: Vec<_> = translations
        .iter()
        .map(|t| (t.language.as_str(), t.text.as_str()))
        .collect();
    assert_eq!(
        texts,
        vec![
            ("en", "brake"),
            ("en", "brake system"),
            ("es", "freno"),
            ("es", "retardador"),
        ]
    );

    let brake_en = &translations[0];
    assert!(brake_en.finalized);
    assert_eq!(brake_en.note.as_deref(), Some("Also used as a verb."));
    assert_eq!(
        brake_en.part_of_speech_id,
        vocab.resolve(VocabularyKind::PartOfSpeech, "noun").map(|t| t.id)
    );
    let sentences = svc.list_context_sentences(brake_en.id).await.unwrap();
    assert_eq!(sentences[0].text, "Press the brake before shifting out of park.");
    let examples = svc.list_corpus_examples(brake_en.id).await.unwrap();
    assert_eq!(examples[0].address, "https://corpus.example.org/manuals/42");
    assert_eq!(examples[0].description, "Owner manual");

    let retardador = &translations[3];
    assert_eq!(
        retardador.administrative_status_id,
        vocab
            .find_by_name(VocabularyKind::AdministrativeStatus, "Not recommended")
            .map(|t| t.id)
    );
    assert_eq!(
        retardador.administrative_status_reason_id,
        vocab
            .find_by_name(VocabularyKind::AdministrativeStatusReason, "Archaic")
            .map(|t| t.id)
    );

    let definitions = svc.list_definitions(brake.id).await.unwrap();
    assert_eq!(definitions.len(), 2);
    assert!(definitions.iter().all(|d| d.finalized));
    assert_eq!(
        definitions[0].source.as_deref(),
        Some("https://example.org/glossary#brake")
    );
    assert_eq!(definitions[1].source, None);

    let resources = svc.list_external_resources(brake.id).await.unwrap();
    let resources: Vec<_> = resources
        .iter()
        .map(|r| (r.language.as_deref(), r.address.as_str(), r.description.as_str()))
        .collect();
    assert_eq!(
        resources,
        vec![
            (None, "https://example.org/brakes", "Brake overview"),
            (Some("en"), "https://example.org/brake.png", "Drum brake diagram"),
        ]
    );
}

#[tokio::test]
async fn relations_may_point_forward() {
    let svc = seeded_memory_service().await.unwrap();
    let body = r#"
        <termEntry id="narrow">
          <descrip type="broaderConceptGeneric" target="wide"/>
          <langSet xml:lang="en"><tig><term>disc brake</term></tig></langSet>
        </termEntry>
        <termEntry id="wide">
          <langSet xml:lang="en"><tig><term>brake</term></tig></langSet>
        </termEntry>"#;
    let response = Importer::new(&svc)
        .import_bytes(&glossary("Forward"), &tbx(body))
        .await
        .unwrap();

    let concepts = svc.list_concepts(response.glossary.id).await.unwrap();
    assert_eq!(concepts[0].broader_concept_id, Some(concepts[1].id));
    assert_eq!(response.counts.relations, 1);
}

/// Row counts of every table an import writes to.
async fn row_counts(svc: &TermService) -> Vec<(&'static str, i64)> {
    let mut counts = Vec::new();
    for table in [
        "glossaries",
        "glossary_other_languages",
        "concepts",
        "concept_related",
        "translations",
        "definitions",
        "definition_history",
        "external_resources",
        "context_sentences",
        "corpus_examples",
    ] {
        let mut rows = svc
            .db()
            .conn()
            .query(&format!("SELECT COUNT(*) FROM {table}"), ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        counts.push((table, row.get::<i64>(0).unwrap()));
    }
    counts
}

#[tokio::test]
async fn unresolved_reference_rolls_everything_back() {
    let svc = seeded_memory_service().await.unwrap();
    let vocab = svc.load_vocabulary().await.unwrap();
    let existing = svc
        .create_glossary(&NewGlossary::new("Existing", "en").other_languages(["es"]), &vocab)
        .await
        .unwrap();
    let kept = svc.create_concept(existing.id).await.unwrap();
    let kept_term = svc
        .create_translation(&NewTranslation::new(kept.id, "en", "clutch"), &vocab)
        .await
        .unwrap();
    svc.add_context_sentence(kept_term.id, "Press the clutch.").await.unwrap();
    let before = row_counts(&svc).await;

    let body = r#"
        <termEntry id="a">
          <descripGrp>
            <descrip type="subjectField">Field</descrip>
            <ref type="conceptEntryRef" target="b"/>
          </descripGrp>
          <ref type="crossReference" target="b"/>
          <xref type="externalCrossReference" target="https://example.org/alpha">Alpha</xref>
          <langSet xml:lang="en">
            <descripGrp>
              <descrip type="definition">First letter.</descrip>
              <xref target="https://example.org/def"/>
            </descripGrp>
            <xref type="externalCrossReference" target="https://example.org/en">English page</xref>
            <tig>
              <term>alpha</term>
              <descrip type="context">Alpha comes first.</descrip>
              <xref type="corpusTrace" target="https://corpus.example.org/1">Primer</xref>
            </tig>
          </langSet>
          <langSet xml:lang="es"><tig><term>alfa</term></tig></langSet>
        </termEntry>
        <termEntry id="b">
          <descrip type="broaderConceptGeneric" target="missing"/>
          <langSet xml:lang="en"><tig><term>beta</term></tig></langSet>
        </termEntry>"#;
    let err = Importer::new(&svc)
        .import_bytes(&glossary("Broken"), &tbx(body))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        ImportError::UnresolvedConceptReference {
            concept_id,
            relation: ConceptRelation::BroaderConcept,
            missing_key,
        } if concept_id == "b" && missing_key == "missing"
    ));
    assert_eq!(row_counts(&svc).await, before);
    assert_eq!(glossary_names(&svc).await, vec!["Existing"]);
    assert_eq!(svc.count_concepts(existing.id).await.unwrap(), 1);
    assert_eq!(svc.list_translations(kept.id).await.unwrap(), vec![kept_term]);
    assert!(svc.find_glossary_by_name("Broken").await.unwrap().is_none());
    assert_eq!(svc.load_vocabulary().await.unwrap().len(), vocab.len());

    // The name is free again after the rollback.
    let retry = tbx(r#"<termEntry id="a"><langSet xml:lang="en"><tig><term>alpha</term></tig></langSet></termEntry>"#);
    Importer::new(&svc)
        .import_bytes(&glossary("Broken"), &retry)
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_entry_id_is_rejected() {
    let svc = seeded_memory_service().await.unwrap();
    let body = r#"
        <termEntry id="c1"><langSet xml:lang="en"><tig><term>brake</term></tig></langSet></termEntry>
        <termEntry id="c1"><langSet xml:lang="en"><tig><term>clutch</term></tig></langSet></termEntry>"#;
    let err = Importer::new(&svc)
        .import_bytes(&glossary("Dupes"), &tbx(body))
        .await
        .unwrap_err();

    assert!(matches!(&err, ImportError::DuplicateId(id) if id == "c1"));
    assert!(glossary_names(&svc).await.is_empty());
}

#[tokio::test]
async fn taken_name_is_rejected_without_writes() {
    let svc = seeded_memory_service().await.unwrap();
    let importer = Importer::new(&svc);
    importer
        .import_path(&glossary("Automotive"), &fixture("automotive.tbx"))
        .await
        .unwrap();

    let err = importer
        .import_path(&glossary("Automotive"), &fixture("automotive.tbx"))
        .await
        .unwrap_err();

    assert!(matches!(&err, ImportError::GlossaryNameTaken(name) if name == "Automotive"));
    assert_eq!(glossary_names(&svc).await, vec!["Automotive"]);
}

#[tokio::test]
async fn gender_without_part_of_speech_is_dropped() {
    let svc = seeded_memory_service().await.unwrap();
    let body = r#"
        <termEntry id="c1"><langSet xml:lang="es"><tig>
          <term>freno</term>
          <termNote type="grammaticalGender">masculine</termNote>
          <termNote type="grammaticalNumber">singular</termNote>
        </tig></langSet></termEntry>"#;
    let response = Importer::new(&svc)
        .import_bytes(&glossary("Grammar"), &tbx(body))
        .await
        .unwrap();

    let concept = &svc.list_concepts(response.glossary.id).await.unwrap()[0];
    let freno = &svc.list_translations(concept.id).await.unwrap()[0];
    assert_eq!(freno.part_of_speech_id, None);
    assert_eq!(freno.grammatical_gender_id, None);
    assert_eq!(freno.grammatical_number_id, None);
}

#[tokio::test]
async fn unknown_reason_name_is_ignored() {
    let svc = seeded_memory_service().await.unwrap();
    let body = r#"
        <termEntry id="c1"><langSet xml:lang="en"><tig>
          <term>retarder</term>
          <termNoteGrp>
            <termNote type="administrativeStatus">deprecatedTerm-admn-sts</termNote>
            <note>Too informal</note>
          </termNoteGrp>
        </tig></langSet></termEntry>"#;
    let response = Importer::new(&svc)
        .import_bytes(&glossary("Reasons"), &tbx(body))
        .await
        .unwrap();

    let concept = &svc.list_concepts(response.glossary.id).await.unwrap()[0];
    let term = &svc.list_translations(concept.id).await.unwrap()[0];
    assert!(term.administrative_status_id.is_some());
    assert_eq!(term.administrative_status_reason_id, None);
}

#[tokio::test]
async fn self_reference_is_a_validation_error() {
    let svc = seeded_memory_service().await.unwrap();
    let body = r#"
        <termEntry id="loop">
          <ref type="crossReference" target="loop"/>
          <langSet xml:lang="en"><tig><term>loop</term></tig></langSet>
        </termEntry>"#;
    let err = Importer::new(&svc)
        .import_bytes(&glossary("Loops"), &tbx(body))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ImportError::Validation(ValidationError::SelfReference {
            relation: ConceptRelation::RelatedConcept,
            ..
        })
    ));
    assert!(glossary_names(&svc).await.is_empty());
}

#[tokio::test]
async fn unknown_status_names_the_concept_and_language() {
    let svc = seeded_memory_service().await.unwrap();
    let body = r#"
        <termEntry id="c7"><langSet xml:lang="es"><tig>
          <term>freno</term>
          <termNote type="administrativeStatus">bogusTerm-admn-sts</termNote>
        </tig></langSet></termEntry>"#;
    let err = Importer::new(&svc)
        .import_bytes(&glossary("Statuses"), &tbx(body))
        .await
        .unwrap_err();

    assert!(matches!(
        &err,
        ImportError::UnknownVocabularyTerm {
            kind: VocabularyKind::AdministrativeStatus,
            value,
            concept_id,
            language: Some(language),
        } if value == "bogusTerm-admn-sts" && concept_id == "c7" && language == "es"
    ));
    assert!(glossary_names(&svc).await.is_empty());
}

#[tokio::test]
async fn malformed_documents_write_nothing() {
    let svc = seeded_memory_service().await.unwrap();
    let importer = Importer::new(&svc);

    let err = importer
        .import_bytes(&glossary("Bad"), b"<martif type=\"TBX\"><text>")
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::Xml(_)));

    let err = importer
        .import_bytes(&glossary("Bad"), b"<glossary/>")
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::StructuralError(_)));

    assert!(glossary_names(&svc).await.is_empty());
}
