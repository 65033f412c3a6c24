//! Definition repository with append-only history.

use term_core::entities::{Definition, DefinitionHistoryEntry, NewDefinition};

use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string, parse_datetime};
use crate::service::TermService;

pub(crate) const SELECT_COLS: &str =
    "d.id, d.concept_id, d.language, d.text, d.finalized, d.source";

pub(crate) fn row_to_definition(row: &libsql::Row) -> Result<Definition, DatabaseError> {
    Ok(Definition {
        id: row.get::<i64>(0)?,
        concept_id: row.get::<i64>(1)?,
        language: row.get::<String>(2)?,
        text: row.get::<String>(3)?,
        finalized: get_flag(row, 4)?,
        source: get_opt_string(row, 5)?,
    })
}

fn row_to_history(row: &libsql::Row) -> Result<DefinitionHistoryEntry, DatabaseError> {
    Ok(DefinitionHistoryEntry {
        id: row.get::<i64>(0)?,
        definition_id: row.get::<i64>(1)?,
        text: row.get::<String>(2)?,
        finalized: get_flag(row, 3)?,
        source: get_opt_string(row, 4)?,
        recorded_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl TermService {
    /// Insert a definition and record it in the history.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the concept already has a definition
    /// in this language.
    pub async fn create_definition(
        &self,
        definition: &NewDefinition,
    ) -> Result<Definition, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO definitions (concept_id, language, text, finalized, source)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    definition.concept_id,
                    definition.language.as_str(),
                    definition.text.as_str(),
                    i64::from(definition.finalized),
                    definition.source.as_deref()
                ],
            )
            .await?;
        let stored = Definition {
            id: self.db().last_insert_id(),
            concept_id: definition.concept_id,
            language: definition.language.clone(),
            text: definition.text.clone(),
            finalized: definition.finalized,
            source: definition.source.clone(),
        };
        self.append_definition_history(&stored).await?;
        Ok(stored)
    }

    /// Change a definition's content and record the new version in the history.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the definition does not exist.
    pub async fn update_definition(
        &self,
        id: i64,
        text: &str,
        finalized: bool,
        source: Option<&str>,
    ) -> Result<Definition, DatabaseError> {
        let updated = self
            .db()
            .conn()
            .execute(
                "UPDATE definitions SET text = ?1, finalized = ?2, source = ?3 WHERE id = ?4",
                libsql::params![text, i64::from(finalized), source, id],
            )
            .await?;
        if updated == 0 {
            return Err(DatabaseError::not_found("definition", id));
        }
        let definition = self.get_definition(id).await?;
        self.append_definition_history(&definition).await?;
        Ok(definition)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no definition has this id.
    pub async fn get_definition(&self, id: i64) -> Result<Definition, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM definitions d WHERE d.id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("definition", id))?;
        row_to_definition(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_definitions(&self, concept_id: i64) -> Result<Vec<Definition>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM definitions d WHERE d.concept_id = ?1 ORDER BY d.id"),
                [concept_id],
            )
            .await?;
        let mut definitions = Vec::new();
        while let Some(row) = rows.next().await? {
            definitions.push(row_to_definition(&row)?);
        }
        Ok(definitions)
    }

    /// History of a definition, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn definition_history(
        &self,
        definition_id: i64,
    ) -> Result<Vec<DefinitionHistoryEntry>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, definition_id, text, finalized, source, recorded_at
                 FROM definition_history WHERE definition_id = ?1 ORDER BY id",
                [definition_id],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_history(&row)?);
        }
        Ok(entries)
    }

    async fn append_definition_history(&self, definition: &Definition) -> Result<(), DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO definition_history (definition_id, text, finalized, source)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    definition.id,
                    definition.text.as_str(),
                    i64::from(definition.finalized),
                    definition.source.as_deref()
                ],
            )
            .await?;
        Ok(())
    }
}
