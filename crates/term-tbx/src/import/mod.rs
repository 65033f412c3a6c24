//! Transactional TBX importer.
//!
//! ```text
//! bytes -> reader::decode/parse_document
//!       -> BEGIN IMMEDIATE
//!       -> create glossary
//!       -> phase 1: extract + persist every termEntry
//!       -> phase 2: wire subject field / broader / related
//!       -> COMMIT
//! ```
//!
//! On any failure after the glossary exists, the protected relations of every
//! created concept are detached, the glossary is deleted and that cleanup is
//! committed before the original error is returned.

pub mod builder;
pub mod extract;

use std::path::Path;
use std::time::Instant;

use roxmltree::Document;
use term_core::entities::NewGlossary;
use term_core::responses::{ImportCounts, ImportResponse};
use term_core::vocabulary::Vocabulary;
use term_db::service::TermService;
use tracing::{error, info, warn};

use crate::error::ImportError;
use crate::reader;
use builder::GraphBuilder;
use extract::{entry_key, extract_concept};

/// Imports TBX documents into new glossaries.
pub struct Importer<'a> {
    service: &'a TermService,
}

impl<'a> Importer<'a> {
    #[must_use]
    pub const fn new(service: &'a TermService) -> Self {
        Self { service }
    }

    /// Read a TBX file and import it into a new glossary.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::Io` if the file can not be read, otherwise the
    /// errors of [`Self::import_bytes`].
    pub async fn import_path(
        &self,
        glossary: &NewGlossary,
        path: &Path,
    ) -> Result<ImportResponse, ImportError> {
        let bytes = tokio::fs::read(path).await?;
        self.import_bytes(glossary, &bytes).await
    }

    /// Import a TBX document into a new glossary.
    ///
    /// Either the glossary and every entity read from the document are
    /// committed, or nothing is.
    ///
    /// # Errors
    ///
    /// Returns `ImportError::GlossaryNameTaken` before anything is written if
    /// the name is in use, a reader error for malformed input, and any
    /// [`ImportError`] raised while building the concept graph.
    pub async fn import_bytes(
        &self,
        glossary: &NewGlossary,
        bytes: &[u8],
    ) -> Result<ImportResponse, ImportError> {
        let start = Instant::now();
        let doc = reader::parse_document(reader::decode(bytes)?)?;

        if self
            .service
            .find_glossary_by_name(&glossary.name)
            .await?
            .is_some()
        {
            return Err(ImportError::GlossaryNameTaken(glossary.name.clone()));
        }
        let vocabulary = self.service.load_vocabulary().await?;
        info!(glossary = %glossary.name, bytes = bytes.len(), "TBX import started");

        let db = self.service.db();
        db.begin().await?;
        let created = match self.service.create_glossary(glossary, &vocabulary).await {
            Ok(created) => created,
            Err(e) => {
                if let Err(rollback) = db.rollback().await {
                    warn!(error = %rollback, "rollback after failed glossary creation");
                }
                return Err(e.into());
            }
        };

        let mut graph = GraphBuilder::new(self.service, &vocabulary, created.id);
        match build(&doc, &mut graph, &vocabulary).await {
            Ok(()) => {
                if let Err(e) = db.commit().await {
                    if let Err(rollback) = db.rollback().await {
                        error!(glossary_id = created.id, error = %rollback, "rollback after failed commit failed");
                    }
                    return Err(e.into());
                }
                let counts = graph.counts();
                let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                info!(
                    glossary_id = created.id,
                    concepts = counts.concepts,
                    translations = counts.translations,
                    duration_ms,
                    "TBX import committed"
                );
                Ok(ImportResponse {
                    glossary: self.service.get_glossary(created.id).await?,
                    counts,
                    duration_ms,
                })
            }
            Err(e) => {
                warn!(glossary_id = created.id, error = %e, "TBX import failed, removing partial glossary");
                self.discard(created.id, &graph.created_concept_ids(), graph.counts())
                    .await;
                Err(e)
            }
        }
    }

    /// Detach protected relations, delete the glossary and commit. If that
    /// fails the transaction is rolled back instead.
    async fn discard(&self, glossary_id: i64, concept_ids: &[i64], counts: ImportCounts) {
        let db = self.service.db();
        let cleanup = async {
            let detached = self.service.detach_protected_relations(concept_ids).await?;
            self.service.delete_glossary(glossary_id).await?;
            db.commit().await?;
            Ok::<_, ImportError>(detached)
        };
        match cleanup.await {
            Ok(detached) => info!(
                glossary_id,
                concepts = counts.concepts,
                detached,
                "partial import removed"
            ),
            Err(cleanup_err) => {
                error!(glossary_id, error = %cleanup_err, "cleanup after failed import failed");
                if let Err(rollback) = db.rollback().await {
                    error!(glossary_id, error = %rollback, "rollback after failed cleanup failed");
                }
            }
        }
    }
}

async fn build(
    doc: &Document<'_>,
    graph: &mut GraphBuilder<'_, Vocabulary>,
    vocabulary: &Vocabulary,
) -> Result<(), ImportError> {
    for entry in reader::term_entries(doc) {
        let key = entry_key(entry)?;
        graph.ensure_unique(&key)?;
        let draft = extract_concept(entry, &key, vocabulary)?;
        graph.add_concept(draft).await?;
    }
    graph.wire_relations().await
}
