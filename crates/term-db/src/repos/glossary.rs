//! Glossary repository — create, read, list, delete.

use term_core::entities::{Glossary, NewGlossary};
use term_core::enums::VocabularyKind;
use term_core::validation::validate_glossary;
use term_core::vocabulary::VocabularyLookup;
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::service::TermService;

const SELECT_COLS: &str = "id, name, description, source_language, created_at";

fn row_to_glossary(row: &libsql::Row) -> Result<Glossary, DatabaseError> {
    Ok(Glossary {
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        description: row.get::<String>(2)?,
        source_language: row.get::<String>(3)?,
        other_languages: Vec::new(),
        subscribers: Vec::new(),
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl TermService {
    /// Create a glossary after validating its languages.
    ///
    /// Language codes are stored in the vocabulary's spelling.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` for an invalid glossary and
    /// `DatabaseError::LibSql` if the name is already taken.
    pub async fn create_glossary(
        &self,
        glossary: &NewGlossary,
        vocabulary: &impl VocabularyLookup,
    ) -> Result<Glossary, DatabaseError> {
        validate_glossary(glossary, vocabulary)?;
        let canonical = |code: &str| {
            vocabulary
                .resolve(VocabularyKind::Language, code)
                .map_or_else(|| code.to_string(), |t| t.representation.clone())
        };

        self.db()
            .conn()
            .execute(
                "INSERT INTO glossaries (name, description, source_language) VALUES (?1, ?2, ?3)",
                libsql::params![
                    glossary.name.as_str(),
                    glossary.description.as_str(),
                    canonical(&glossary.source_language)
                ],
            )
            .await?;
        let id = self.db().last_insert_id();

        for (position, code) in glossary.other_languages.iter().enumerate() {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO glossary_other_languages (glossary_id, language, position)
                     VALUES (?1, ?2, ?3) ON CONFLICT DO NOTHING",
                    libsql::params![id, canonical(code), i64::try_from(position).unwrap_or(i64::MAX)],
                )
                .await?;
        }

        debug!(glossary_id = id, name = %glossary.name, "glossary created");
        self.get_glossary(id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no glossary has this id.
    pub async fn get_glossary(&self, id: i64) -> Result<Glossary, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM glossaries WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("glossary", id))?;
        let glossary = row_to_glossary(&row)?;
        self.hydrate_glossary(glossary).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_glossary_by_name(&self, name: &str) -> Result<Option<Glossary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM glossaries WHERE name = ?1"),
                [name],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(self.hydrate_glossary(row_to_glossary(&row)?).await?)),
            None => Ok(None),
        }
    }

    /// All glossaries ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_glossaries(&self) -> Result<Vec<Glossary>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM glossaries ORDER BY id"),
                (),
            )
            .await?;
        let mut plain = Vec::new();
        while let Some(row) = rows.next().await? {
            plain.push(row_to_glossary(&row)?);
        }
        let mut glossaries = Vec::with_capacity(plain.len());
        for glossary in plain {
            glossaries.push(self.hydrate_glossary(glossary).await?);
        }
        Ok(glossaries)
    }

    /// Delete a glossary and, through cascades, everything it owns.
    ///
    /// Fails while any of its concepts still references another through a
    /// delete-protected relation; see [`Self::detach_protected_relations`].
    /// Returns `false` if the glossary did not exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` on a foreign key violation.
    pub async fn delete_glossary(&self, id: i64) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute("DELETE FROM glossaries WHERE id = ?1", [id])
            .await?;
        debug!(glossary_id = id, deleted, "glossary delete");
        Ok(deleted > 0)
    }

    /// Detach every protected relation in the glossary, then delete it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if either step fails.
    pub async fn purge_glossary(&self, id: i64) -> Result<bool, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "UPDATE concepts SET subject_field_id = NULL, broader_concept_id = NULL
                 WHERE glossary_id = ?1",
                [id],
            )
            .await?;
        self.delete_glossary(id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the glossary does not exist.
    pub async fn add_glossary_subscriber(
        &self,
        glossary_id: i64,
        subscriber: &str,
    ) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO glossary_subscribers (glossary_id, subscriber) VALUES (?1, ?2)
                 ON CONFLICT DO NOTHING",
                libsql::params![glossary_id, subscriber],
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_concepts(&self, glossary_id: i64) -> Result<u32, DatabaseError> {
        self.count(
            "SELECT COUNT(*) FROM concepts WHERE glossary_id = ?1",
            [glossary_id],
        )
        .await
    }

    async fn hydrate_glossary(&self, mut glossary: Glossary) -> Result<Glossary, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT language FROM glossary_other_languages WHERE glossary_id = ?1
                 ORDER BY position, language",
                [glossary.id],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            glossary.other_languages.push(row.get::<String>(0)?);
        }

        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT subscriber FROM glossary_subscribers WHERE glossary_id = ?1
                 ORDER BY subscriber",
                [glossary.id],
            )
            .await?;
        while let Some(row) = rows.next().await? {
            glossary.subscribers.push(row.get::<String>(0)?);
        }
        Ok(glossary)
    }
}
