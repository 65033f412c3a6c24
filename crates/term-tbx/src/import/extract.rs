//! Phase 1 extraction: one `termEntry` node to a [`ConceptDraft`].
//!
//! Extraction is pure. Every vocabulary string is resolved here so a draft
//! only carries ids and canonical language codes; relation targets stay as
//! document keys until phase 2.

use roxmltree::Node;
use term_core::entities::NewTranslation;
use term_core::enums::VocabularyKind;
use term_core::validation::clear_dangling_grammar;
use term_core::vocabulary::VocabularyLookup;
use tracing::{debug, warn};

use crate::error::ImportError;
use crate::reader::{attr, children, descendants, has_type, is_tag, text, xml_lang};

/// Relation targets of one concept, as document keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingRelations {
    pub subject_key: Option<String>,
    pub broader_key: Option<String>,
    /// In document order, duplicates kept.
    pub related_keys: Vec<String>,
}

impl PendingRelations {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subject_key.is_none() && self.broader_key.is_none() && self.related_keys.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptDraft {
    /// The `termEntry` id.
    pub key: String,
    pub relations: PendingRelations,
    /// `xref` children of the `termEntry` itself.
    pub concept_resources: Vec<ResourceDraft>,
    pub languages: Vec<LanguageDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDraft {
    /// Canonical language code.
    pub language: String,
    pub definition: Option<DefinitionDraft>,
    pub resources: Vec<ResourceDraft>,
    pub translations: Vec<TranslationDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionDraft {
    pub text: String,
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDraft {
    pub link_type_id: i64,
    pub address: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusExampleDraft {
    pub address: String,
    pub description: String,
}

/// A translation waiting for its concept id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDraft {
    /// `concept_id` is zero until the concept is created.
    pub translation: NewTranslation,
    pub context_sentences: Vec<String>,
    pub corpus_examples: Vec<CorpusExampleDraft>,
}

/// The `id` of a `termEntry`.
///
/// # Errors
///
/// Returns `ImportError::MissingRequiredAttribute` if it is missing or blank.
pub fn entry_key(entry: Node<'_, '_>) -> Result<String, ImportError> {
    attr(entry, "id")
        .map(str::to_string)
        .ok_or(ImportError::MissingRequiredAttribute {
            tag: "termEntry",
            attribute: "id",
            concept_id: None,
        })
}

/// Extract everything phase 1 needs from one `termEntry`.
///
/// # Errors
///
/// Returns the first document problem found: a missing attribute, an unknown
/// language or vocabulary term, or a `langSet` without any `tig`.
pub fn extract_concept(
    entry: Node<'_, '_>,
    key: &str,
    vocabulary: &impl VocabularyLookup,
) -> Result<ConceptDraft, ImportError> {
    let relations = PendingRelations {
        subject_key: subject_key(entry, key)?,
        broader_key: descendants(entry, "descrip")
            .filter(|d| has_type(*d, "broaderConceptGeneric"))
            .find_map(|d| attr(d, "target"))
            .map(str::to_string),
        related_keys: children(entry, "ref")
            .filter(|r| has_type(*r, "crossReference"))
            .filter_map(|r| attr(r, "target"))
            .map(str::to_string)
            .collect(),
    };

    let concept_resources = resources(entry, key, None, vocabulary)?;

    let languages = descendants(entry, "langSet")
        .map(|lang_set| extract_language(lang_set, key, vocabulary))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConceptDraft {
        key: key.to_string(),
        relations,
        concept_resources,
        languages,
    })
}

/// First `ref` found in a `descripGrp` holding a subject field. Groups
/// without a `ref` are skipped.
fn subject_key(entry: Node<'_, '_>, key: &str) -> Result<Option<String>, ImportError> {
    let reference = descendants(entry, "descrip")
        .filter(|d| has_type(*d, "subjectField"))
        .filter_map(|d| d.parent_element())
        .filter(|parent| is_tag(*parent, "descripGrp"))
        .find_map(|group| descendants(group, "ref").next());
    let Some(reference) = reference else {
        return Ok(None);
    };
    attr(reference, "target")
        .map(|target| Some(target.to_string()))
        .ok_or_else(|| ImportError::MissingRequiredAttribute {
            tag: "ref",
            attribute: "target",
            concept_id: Some(key.to_string()),
        })
}

fn extract_language(
    lang_set: Node<'_, '_>,
    key: &str,
    vocabulary: &impl VocabularyLookup,
) -> Result<LanguageDraft, ImportError> {
    let code = xml_lang(lang_set).ok_or_else(|| ImportError::MissingRequiredAttribute {
        tag: "langSet",
        attribute: "xml:lang",
        concept_id: Some(key.to_string()),
    })?;
    let language = vocabulary
        .resolve(VocabularyKind::Language, code)
        .ok_or_else(|| ImportError::UnknownLanguage {
            code: code.to_string(),
            concept_id: key.to_string(),
        })?
        .representation
        .clone();

    let tigs: Vec<_> = descendants(lang_set, "tig").collect();
    if tigs.is_empty() {
        return Err(ImportError::StructuralError(format!(
            "langSet '{code}' in concept '{key}' has no <tig> (ntig is not supported)"
        )));
    }

    let scope = TermScope {
        key,
        language: &language,
    };
    let translations = tigs
        .into_iter()
        .filter_map(|tig| extract_translation(tig, &scope, vocabulary).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LanguageDraft {
        definition: definition(lang_set),
        resources: resources(lang_set, key, Some(&language), vocabulary)?,
        translations,
        language,
    })
}

/// The first definition `descrip` of a `langSet`. A blank one means no definition.
fn definition(lang_set: Node<'_, '_>) -> Option<DefinitionDraft> {
    let descrip = descendants(lang_set, "descrip").find(|d| has_type(*d, "definition"))?;
    let text = text(descrip);
    if text.is_empty() {
        return None;
    }
    let source = descrip
        .parent_element()
        .filter(|parent| is_tag(*parent, "descripGrp"))
        .and_then(|group| descendants(group, "xref").next())
        .and_then(|xref| attr(xref, "target"))
        .map(str::to_string);
    Some(DefinitionDraft { text, source })
}

/// `xref` children of `node`, corpus traces excluded. Entries without an
/// address or description are skipped once their link type has resolved.
fn resources(
    node: Node<'_, '_>,
    key: &str,
    language: Option<&str>,
    vocabulary: &impl VocabularyLookup,
) -> Result<Vec<ResourceDraft>, ImportError> {
    let mut out = Vec::new();
    for xref in children(node, "xref").filter(|x| !has_type(*x, "corpusTrace")) {
        let link_type = xref.attribute("type").unwrap_or_default();
        let term = vocabulary
            .resolve(VocabularyKind::ExternalLinkType, link_type)
            .ok_or_else(|| ImportError::UnknownVocabularyTerm {
                kind: VocabularyKind::ExternalLinkType,
                value: link_type.to_string(),
                concept_id: key.to_string(),
                language: language.map(str::to_string),
            })?;
        let description = text(xref);
        match attr(xref, "target") {
            Some(address) if !description.is_empty() => out.push(ResourceDraft {
                link_type_id: term.id,
                address: address.to_string(),
                description,
            }),
            _ => debug!(concept = key, link_type, "skipping xref without target or description"),
        }
    }
    Ok(out)
}

struct TermScope<'a> {
    key: &'a str,
    language: &'a str,
}

impl TermScope<'_> {
    fn resolve<'v>(
        &self,
        vocabulary: &'v impl VocabularyLookup,
        kind: VocabularyKind,
        value: &str,
    ) -> Result<&'v term_core::entities::VocabularyTerm, ImportError> {
        vocabulary
            .resolve(kind, value)
            .ok_or_else(|| ImportError::UnknownVocabularyTerm {
                kind,
                value: value.to_string(),
                concept_id: self.key.to_string(),
                language: Some(self.language.to_string()),
            })
    }
}

/// A `tig` without a `term` yields `None`.
fn extract_translation(
    tig: Node<'_, '_>,
    scope: &TermScope<'_>,
    vocabulary: &impl VocabularyLookup,
) -> Result<Option<TranslationDraft>, ImportError> {
    let Some(term) = children(tig, "term").next() else {
        return Ok(None);
    };
    let mut translation = NewTranslation {
        language: scope.language.to_string(),
        text: text(term),
        ..NewTranslation::default()
    };

    // termNotes sit directly in the tig or one level down in a termNoteGrp.
    let notes = tig
        .children()
        .flat_map(|child| {
            if is_tag(child, "termNoteGrp") {
                children(child, "termNote").collect::<Vec<_>>()
            } else if is_tag(child, "termNote") {
                vec![child]
            } else {
                Vec::new()
            }
        });

    for note in notes {
        let value = text(note);
        match note.attribute("type").unwrap_or_default() {
            "partOfSpeech" | "termType" => {
                translation.part_of_speech_id =
                    Some(scope.resolve(vocabulary, VocabularyKind::PartOfSpeech, &value)?.id);
            }
            "grammaticalGender" => {
                translation.grammatical_gender_id =
                    Some(scope.resolve(vocabulary, VocabularyKind::GrammaticalGender, &value)?.id);
            }
            "grammaticalNumber" => {
                translation.grammatical_number_id =
                    Some(scope.resolve(vocabulary, VocabularyKind::GrammaticalNumber, &value)?.id);
            }
            "processStatus" => {
                if value == "finalized" {
                    translation.finalized = true;
                }
            }
            "administrativeStatus" => {
                let status =
                    scope.resolve(vocabulary, VocabularyKind::AdministrativeStatus, &value)?;
                translation.administrative_status_id = Some(status.id);
                if status.allows_reason
                    && let Some(group) = note.parent_element().filter(|p| *p != tig)
                    && let Some(reason_note) = descendants(group, "note").next()
                {
                    let reason_name = text(reason_note);
                    match vocabulary
                        .find_by_name(VocabularyKind::AdministrativeStatusReason, &reason_name)
                    {
                        Some(reason) => translation.administrative_status_reason_id = Some(reason.id),
                        None => warn!(
                            concept = scope.key,
                            language = scope.language,
                            term = %translation.text,
                            reason = %reason_name,
                            "unknown administrative status reason ignored"
                        ),
                    }
                }
            }
            _ => {}
        }
    }

    if clear_dangling_grammar(&mut translation) {
        debug!(
            concept = scope.key,
            term = %translation.text,
            "gender/number dropped from term without part of speech"
        );
    }

    translation.note = children(tig, "note")
        .next()
        .map(text)
        .filter(|note| !note.is_empty());

    let context_sentences = children(tig, "descrip")
        .filter(|d| has_type(*d, "context"))
        .map(text)
        .filter(|sentence| !sentence.is_empty())
        .collect();

    let corpus_examples = children(tig, "xref")
        .filter(|x| has_type(*x, "corpusTrace"))
        .filter_map(|x| {
            let description = text(x);
            let address = attr(x, "target")?;
            (!description.is_empty()).then(|| CorpusExampleDraft {
                address: address.to_string(),
                description,
            })
        })
        .collect();

    Ok(Some(TranslationDraft {
        translation,
        context_sentences,
        corpus_examples,
    }))
}
