//! Per-language concept state (`ConceptInLanguage`).

use chrono::Utc;
use term_core::entities::ConceptInLanguage;

use crate::error::DatabaseError;
use crate::helpers::{get_flag, parse_datetime};
use crate::service::TermService;

pub(crate) const SELECT_COLS: &str =
    "s.id, s.concept_id, s.language, s.summary, s.finalized, s.updated_at";

pub(crate) fn row_to_summary(row: &libsql::Row) -> Result<ConceptInLanguage, DatabaseError> {
    Ok(ConceptInLanguage {
        id: row.get::<i64>(0)?,
        concept_id: row.get::<i64>(1)?,
        language: row.get::<String>(2)?,
        summary: row.get::<String>(3)?,
        finalized: get_flag(row, 4)?,
        updated_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl TermService {
    /// Create or replace the summary of a concept in one language.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the concept or language does not exist.
    pub async fn upsert_concept_in_language(
        &self,
        concept_id: i64,
        language: &str,
        summary: &str,
        finalized: bool,
    ) -> Result<ConceptInLanguage, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO concepts_in_language (concept_id, language, summary, finalized, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(concept_id, language) DO UPDATE SET
                     summary = excluded.summary,
                     finalized = excluded.finalized,
                     updated_at = excluded.updated_at",
                libsql::params![
                    concept_id,
                    language,
                    summary,
                    i64::from(finalized),
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;
        self.get_concept_in_language(concept_id, language)
            .await?
            .ok_or(DatabaseError::NoResult)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_concept_in_language(
        &self,
        concept_id: i64,
        language: &str,
    ) -> Result<Option<ConceptInLanguage>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM concepts_in_language s
                     WHERE s.concept_id = ?1 AND s.language = ?2"
                ),
                libsql::params![concept_id, language],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_summary(&row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::{test_concept, test_glossary, test_service};

    #[tokio::test]
    async fn upsert_replaces_summary() {
        let svc = test_service().await;
        let glossary = test_glossary(&svc, "Automotive").await;
        let concept = test_concept(&svc, glossary.id).await;

        let first = svc
            .upsert_concept_in_language(concept.id, "es", "Draft", false)
            .await
            .unwrap();
        let second = svc
            .upsert_concept_in_language(concept.id, "es", "Agreed", true)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.summary, "Agreed");
        assert!(second.finalized);
        assert_eq!(
            svc.get_concept_in_language(concept.id, "en").await.unwrap(),
            None
        );
    }
}
