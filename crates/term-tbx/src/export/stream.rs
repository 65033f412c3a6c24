//! Store-backed bundle stream.

use term_db::repos::export::ConceptCursor;

use super::grouping::{ConceptBundle, GroupingEngine};
use crate::error::ExportError;

/// Pulls concepts from the store one at a time and bundles them.
///
/// Single pass: once exhausted it stays exhausted. Dropping it early needs no
/// cleanup.
pub struct ExportStream {
    cursor: ConceptCursor,
    engine: GroupingEngine,
}

impl ExportStream {
    pub(crate) const fn new(cursor: ConceptCursor, engine: GroupingEngine) -> Self {
        Self { cursor, engine }
    }

    /// The next concept with at least one non-empty language bundle.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Database` if reading the next concept fails.
    pub async fn next_bundle(&mut self) -> Result<Option<ConceptBundle>, ExportError> {
        while let Some(concept) = self.cursor.next().await? {
            if let Some(bundle) = self.engine.bundle(concept) {
                return Ok(Some(bundle));
            }
        }
        Ok(None)
    }

    #[must_use]
    pub fn used_languages(&self) -> &[String] {
        self.engine.used_languages()
    }
}
