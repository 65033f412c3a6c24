//! TBX serializer.
//!
//! Renders an [`ExportHeader`] and a sequence of [`ConceptBundle`]s as a
//! `martif type="TBX"` document the importer can read back. Vocabulary ids
//! are written as their TBX representation; administrative status reasons
//! are written by name, the way the importer looks them up.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use term_core::entities::ExternalResource;
use term_core::enums::VocabularyKind;
use term_core::vocabulary::VocabularyLookup;

use super::ExportHeader;
use super::grouping::{ConceptBundle, ExportTranslation, LanguageBundle};
use crate::error::ExportError;

const DOCTYPE: &str = r#"martif SYSTEM "TBXcoreStructV02.dtd""#;
const XCS_URI: &str = "TBXXCSV02.xcs";

/// Parts of speech written as `termType` instead of `partOfSpeech`.
const TERM_TYPES: [&str; 3] = ["abbreviation", "acronym", "phraseologicalUnit"];

/// Document key of a concept; also the target of references to it.
#[must_use]
pub fn concept_key(concept_id: i64) -> String {
    format!("c{concept_id}")
}

type Attrs<'a> = &'a [(&'a str, &'a str)];

pub struct TbxWriter<'v, W: Write, V> {
    xml: Writer<W>,
    vocabulary: &'v V,
}

impl<'v, W: Write, V: VocabularyLookup> TbxWriter<'v, W, V> {
    pub fn new(inner: W, vocabulary: &'v V) -> Self {
        Self {
            xml: Writer::new_with_indent(inner, b' ', 2),
            vocabulary,
        }
    }

    /// XML declaration, doctype, `martifHeader`, and the opening of `body`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if writing fails.
    pub fn write_header(&mut self, header: &ExportHeader) -> Result<(), ExportError> {
        self.xml
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.xml
            .write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
        self.open(
            "martif",
            &[("type", "TBX"), ("xml:lang", header.source_language.as_str())],
        )?;
        self.open("martifHeader", &[])?;
        self.open("fileDesc", &[])?;
        self.open("titleStmt", &[])?;
        self.text_element("title", &[], &header.name)?;
        self.close("titleStmt")?;
        self.open("sourceDesc", &[])?;
        self.text_element("p", &[], &header.description)?;
        self.close("sourceDesc")?;
        self.close("fileDesc")?;
        self.open("encodingDesc", &[])?;
        self.text_element("p", &[("type", "XCSURI")], XCS_URI)?;
        self.close("encodingDesc")?;
        self.close("martifHeader")?;
        self.open("text", &[])?;
        self.open("body", &[])
    }

    /// One `termEntry`.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if writing fails.
    pub fn write_concept(&mut self, bundle: &ConceptBundle) -> Result<(), ExportError> {
        let concept = &bundle.concept;
        self.open("termEntry", &[("id", concept_key(concept.id).as_str())])?;

        if let Some(subject_field) = concept.subject_field_id {
            self.open("descripGrp", &[])?;
            self.text_element(
                "descrip",
                &[("type", "subjectField")],
                bundle.subject_field_label.as_deref().unwrap_or_default(),
            )?;
            self.empty(
                "ref",
                &[("type", "conceptEntryRef"), ("target", concept_key(subject_field).as_str())],
            )?;
            self.close("descripGrp")?;
        }
        if let Some(broader) = concept.broader_concept_id {
            self.empty(
                "descrip",
                &[("type", "broaderConceptGeneric"), ("target", concept_key(broader).as_str())],
            )?;
        }
        for related in &concept.related_concept_ids {
            self.empty(
                "ref",
                &[("type", "crossReference"), ("target", concept_key(*related).as_str())],
            )?;
        }
        for resource in &bundle.concept_resources {
            self.resource(resource)?;
        }
        for language in &bundle.languages {
            self.language(language)?;
        }
        self.close("termEntry")
    }

    /// Close the document and hand back the flushed output.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if writing or flushing fails.
    pub fn finish(mut self) -> Result<W, ExportError> {
        self.close("body")?;
        self.close("text")?;
        self.close("martif")?;
        let mut inner = self.xml.into_inner();
        inner.flush()?;
        Ok(inner)
    }

    fn language(&mut self, bundle: &LanguageBundle) -> Result<(), ExportError> {
        self.open("langSet", &[("xml:lang", bundle.language.as_str())])?;
        if let Some(definition) = &bundle.definition {
            self.open("descripGrp", &[])?;
            self.text_element("descrip", &[("type", "definition")], &definition.text)?;
            if let Some(source) = &definition.source {
                self.text_element("xref", &[("type", "xSource"), ("target", source.as_str())], source)?;
            }
            self.close("descripGrp")?;
        }
        for resource in &bundle.external_resources {
            self.resource(resource)?;
        }
        if let Some(summary) = &bundle.summary {
            self.text_element("note", &[], &summary.summary)?;
        }
        for translation in &bundle.translations {
            self.translation(translation)?;
        }
        self.close("langSet")
    }

    fn translation(&mut self, exported: &ExportTranslation) -> Result<(), ExportError> {
        let t = &exported.translation;
        self.open("tig", &[])?;
        self.text_element("term", &[], &t.text)?;

        if let Some(pos) = self.representation(VocabularyKind::PartOfSpeech, t.part_of_speech_id) {
            let note_type = if TERM_TYPES.contains(&pos) {
                "termType"
            } else {
                "partOfSpeech"
            };
            self.text_element("termNote", &[("type", note_type)], pos)?;
        }
        if let Some(gender) =
            self.representation(VocabularyKind::GrammaticalGender, t.grammatical_gender_id)
        {
            self.text_element("termNote", &[("type", "grammaticalGender")], gender)?;
        }
        if let Some(number) =
            self.representation(VocabularyKind::GrammaticalNumber, t.grammatical_number_id)
        {
            self.text_element("termNote", &[("type", "grammaticalNumber")], number)?;
        }
        if let Some(status) =
            self.representation(VocabularyKind::AdministrativeStatus, t.administrative_status_id)
        {
            let vocabulary = self.vocabulary;
            let reason = t
                .administrative_status_reason_id
                .and_then(|id| vocabulary.term(VocabularyKind::AdministrativeStatusReason, id));
            match reason {
                Some(reason) => {
                    self.open("termNoteGrp", &[])?;
                    self.text_element("termNote", &[("type", "administrativeStatus")], status)?;
                    self.text_element("note", &[], &reason.name)?;
                    self.close("termNoteGrp")?;
                }
                None => {
                    self.text_element("termNote", &[("type", "administrativeStatus")], status)?;
                }
            }
        }
        if t.finalized {
            self.text_element("termNote", &[("type", "processStatus")], "finalized")?;
        }
        if let Some(note) = &t.note {
            self.text_element("note", &[], note)?;
        }
        for sentence in &exported.context_sentences {
            self.text_element("descrip", &[("type", "context")], &sentence.text)?;
        }
        for example in &exported.corpus_examples {
            self.text_element(
                "xref",
                &[("type", "corpusTrace"), ("target", example.address.as_str())],
                &example.description,
            )?;
        }
        self.close("tig")
    }

    fn resource(&mut self, resource: &ExternalResource) -> Result<(), ExportError> {
        let Some(link_type) =
            self.representation(VocabularyKind::ExternalLinkType, Some(resource.link_type_id))
        else {
            return Ok(());
        };
        self.text_element(
            "xref",
            &[("type", link_type), ("target", resource.address.as_str())],
            &resource.description,
        )
    }

    fn representation(&self, kind: VocabularyKind, id: Option<i64>) -> Option<&'v str> {
        let vocabulary: &'v V = self.vocabulary;
        id.and_then(|id| vocabulary.term(kind, id))
            .map(|term| term.representation.as_str())
    }

    fn open(&mut self, tag: &str, attrs: Attrs<'_>) -> Result<(), ExportError> {
        let start = BytesStart::new(tag).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Start(start))?;
        Ok(())
    }

    fn close(&mut self, tag: &str) -> Result<(), ExportError> {
        self.xml.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    fn empty(&mut self, tag: &str, attrs: Attrs<'_>) -> Result<(), ExportError> {
        let start = BytesStart::new(tag).with_attributes(attrs.iter().copied());
        self.xml.write_event(Event::Empty(start))?;
        Ok(())
    }

    fn text_element(&mut self, tag: &str, attrs: Attrs<'_>, text: &str) -> Result<(), ExportError> {
        self.open(tag, attrs)?;
        if !text.is_empty() {
            self.xml.write_event(Event::Text(BytesText::new(text)))?;
        }
        self.close(tag)
    }
}
