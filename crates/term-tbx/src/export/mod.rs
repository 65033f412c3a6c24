//! TBX exporter.
//!
//! [`Exporter::open`] loads the rows of the selected glossaries into a
//! [`GroupingEngine`] and returns the document header plus a lazy
//! [`ExportStream`] over concept bundles. [`OpenExport::write_into`] drains
//! the stream through the [`TbxWriter`].

pub mod grouping;
pub mod stream;
pub mod writer;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use term_core::entities::Glossary;
use term_core::responses::ExportResponse;
use term_core::vocabulary::Vocabulary;
use term_db::error::DatabaseError;
use term_db::service::TermService;
use tracing::{debug, info, warn};

use crate::error::ExportError;
pub use grouping::{
    ConceptBundle, ExportOptions, ExportRows, ExportTranslation, GroupingEngine, LanguageBundle,
};
pub use stream::ExportStream;
pub use writer::TbxWriter;

pub const TBX_CONTENT_TYPE: &str = "application/x-tbx";
pub const COMBINED_EXPORT_NAME: &str = "Combined TBX glossary export";
pub const COMBINED_EXPORT_FILENAME: &str = "several_exported_glossaries.tbx";

/// Document-level metadata of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportHeader {
    pub glossary_ids: Vec<i64>,
    pub name: String,
    pub description: String,
    /// Attachment filename.
    pub filename: String,
    pub content_type: &'static str,
    /// `xml:lang` of the document, the first glossary's source language.
    pub source_language: String,
    /// Languages that get a `langSet`, sorted.
    pub languages: Vec<String>,
    pub uses_related_concepts: bool,
}

impl ExportHeader {
    /// A single glossary keeps its own name and description; several are
    /// exported under a combined name.
    #[must_use]
    pub fn for_glossaries(
        glossaries: &[Glossary],
        languages: Vec<String>,
        uses_related_concepts: bool,
    ) -> Self {
        let (name, description, filename) = match glossaries {
            [glossary] => (
                glossary.name.clone(),
                glossary.description.clone(),
                format!("{}.tbx", urlencoding::encode(&glossary.name)),
            ),
            _ => (
                COMBINED_EXPORT_NAME.to_string(),
                format!(
                    "TBX file with concepts from the following glossaries: {}",
                    glossaries
                        .iter()
                        .map(|g| g.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                COMBINED_EXPORT_FILENAME.to_string(),
            ),
        };
        Self {
            glossary_ids: glossaries.iter().map(|g| g.id).collect(),
            name,
            description,
            filename,
            content_type: TBX_CONTENT_TYPE,
            source_language: glossaries
                .first()
                .map(|g| g.source_language.clone())
                .unwrap_or_default(),
            languages,
            uses_related_concepts,
        }
    }
}

/// An export ready to be written.
pub struct OpenExport {
    pub header: ExportHeader,
    pub stream: ExportStream,
    vocabulary: Vocabulary,
}

impl OpenExport {
    /// Write the whole document into `out`. Returns the number of concepts
    /// written.
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if reading from the store or writing fails.
    pub async fn write_into<W: Write>(mut self, out: W) -> Result<u32, ExportError> {
        let mut writer = TbxWriter::new(out, &self.vocabulary);
        writer.write_header(&self.header)?;
        let mut concepts = 0u32;
        while let Some(bundle) = self.stream.next_bundle().await? {
            writer.write_concept(&bundle)?;
            concepts += 1;
        }
        writer.finish()?;
        Ok(concepts)
    }
}

/// Header plus the count of concepts written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub header: ExportHeader,
    pub concepts: u32,
}

/// Exports glossaries as TBX.
pub struct Exporter<'a> {
    service: &'a TermService,
}

impl<'a> Exporter<'a> {
    #[must_use]
    pub const fn new(service: &'a TermService) -> Self {
        Self { service }
    }

    /// Load and index everything the export needs. Concepts themselves are
    /// read lazily by the returned stream.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::NoGlossaries` for an empty selection,
    /// `ExportError::UnknownGlossary` for an id that does not exist, and
    /// `ExportError::Database` if a query fails.
    pub async fn open(
        &self,
        glossary_ids: &[i64],
        options: &ExportOptions,
    ) -> Result<OpenExport, ExportError> {
        let mut ids = glossary_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Err(ExportError::NoGlossaries);
        }

        let mut glossaries = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.service.get_glossary(*id).await {
                Ok(glossary) => glossaries.push(glossary),
                Err(DatabaseError::NotFound { .. }) => return Err(ExportError::UnknownGlossary(*id)),
                Err(e) => return Err(e.into()),
            }
        }

        let vocabulary = self.service.load_vocabulary().await?;
        let rows = ExportRows {
            translations: self.service.export_translations(&ids).await?,
            definitions: self.service.export_definitions(&ids).await?,
            resources: self.service.export_resources(&ids).await?,
            summaries: self.service.export_summaries(&ids).await?,
            context_sentences: self.service.export_context_sentences(&ids).await?,
            corpus_examples: self.service.export_corpus_examples(&ids).await?,
        };
        debug!(
            translations = rows.translations.len(),
            definitions = rows.definitions.len(),
            resources = rows.resources.len(),
            "export rows loaded"
        );
        let engine = GroupingEngine::new(rows, options, &vocabulary);
        let header = ExportHeader::for_glossaries(
            &glossaries,
            engine.used_languages().to_vec(),
            self.service.export_uses_related_concepts(&ids).await?,
        );
        let cursor = self.service.export_concepts(&ids).await?;

        Ok(OpenExport {
            header,
            stream: ExportStream::new(cursor, engine),
            vocabulary,
        })
    }

    /// Export into any writer.
    ///
    /// # Errors
    ///
    /// Same as [`Self::open`] and [`OpenExport::write_into`].
    pub async fn write_to<W: Write>(
        &self,
        glossary_ids: &[i64],
        options: &ExportOptions,
        out: W,
    ) -> Result<ExportOutcome, ExportError> {
        let export = self.open(glossary_ids, options).await?;
        let header = export.header.clone();
        let concepts = export.write_into(out).await?;
        Ok(ExportOutcome { header, concepts })
    }

    /// Export into `dir`, named after the header's attachment filename.
    ///
    /// A partially written file is removed on failure.
    ///
    /// # Errors
    ///
    /// Same as [`Self::write_to`], plus `ExportError::Io` if the directory or
    /// file can not be created.
    pub async fn export_to_dir(
        &self,
        glossary_ids: &[i64],
        options: &ExportOptions,
        dir: &Path,
    ) -> Result<ExportResponse, ExportError> {
        let start = Instant::now();
        let export = self.open(glossary_ids, options).await?;
        let header = export.header.clone();
        info!(
            glossaries = ?header.glossary_ids,
            terms = %options.terms,
            languages = ?header.languages,
            "TBX export started"
        );

        std::fs::create_dir_all(dir)?;
        let path = dir.join(&header.filename);
        let file = File::create(&path)?;
        let concepts = match export.write_into(BufWriter::new(file)).await {
            Ok(concepts) => concepts,
            Err(e) => {
                if let Err(remove) = std::fs::remove_file(&path) {
                    warn!(path = %path.display(), error = %remove, "could not remove partial export");
                }
                return Err(e);
            }
        };

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(path = %path.display(), concepts, duration_ms, "TBX export written");
        Ok(ExportResponse {
            glossary_ids: header.glossary_ids,
            name: header.name,
            filename: header.filename,
            path: path.display().to_string(),
            content_type: header.content_type.to_string(),
            terms: options.terms,
            languages: header.languages,
            concepts,
            duration_ms,
        })
    }
}
