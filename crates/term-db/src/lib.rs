//! # term-db
//!
//! libSQL store for termbase.
//!
//! Holds the controlled vocabularies, glossaries, concepts and every
//! per-language child entity. Repositories are `impl TermService` blocks under
//! [`repos`]; the TBX importer and exporter in `term-tbx` drive them.
//!
//! Uses the `libsql` crate (C `SQLite` fork) with a single local connection.
//! Foreign keys are enabled per connection so the delete-protected concept
//! relations are enforced by the store itself.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod seed;
pub mod service;
pub mod test_support;

use error::DatabaseError;
use libsql::Builder;
use tracing::debug;

/// Central database handle.
///
/// Wraps a libSQL database and its single connection.
pub struct TermDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl TermDb {
    /// Open a local database at the given path, or `:memory:`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let term_db = Self { db, conn };
        term_db.run_migrations().await?;
        debug!(path, "database opened");
        Ok(term_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Start a write transaction. The write lock is taken immediately.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a transaction is already open or the lock
    /// can not be taken.
    pub async fn begin(&self) -> Result<(), DatabaseError> {
        self.conn.execute("BEGIN IMMEDIATE", ()).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if no transaction is open or the commit fails.
    pub async fn commit(&self) -> Result<(), DatabaseError> {
        self.conn.execute("COMMIT", ()).await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if no transaction is open.
    pub async fn rollback(&self) -> Result<(), DatabaseError> {
        self.conn.execute("ROLLBACK", ()).await?;
        Ok(())
    }

    /// Row id assigned by the most recent successful INSERT on this connection.
    #[must_use]
    pub fn last_insert_id(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> TermDb {
        TermDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "languages",
            "parts_of_speech",
            "part_of_speech_for_language",
            "grammatical_genders",
            "language_grammatical_genders",
            "grammatical_numbers",
            "language_grammatical_numbers",
            "administrative_statuses",
            "administrative_status_reasons",
            "administrative_status_reason_languages",
            "external_link_types",
            "glossaries",
            "glossary_other_languages",
            "glossary_subscribers",
            "concepts",
            "concept_related",
            "translations",
            "definitions",
            "definition_history",
            "external_resources",
            "context_sentences",
            "corpus_examples",
            "concepts_in_language",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_enabled() {
        let db = test_db().await;
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn rollback_discards_writes() {
        let db = test_db().await;
        db.begin().await.unwrap();
        db.conn()
            .execute("INSERT INTO languages (code, name) VALUES ('en', 'English')", ())
            .await
            .unwrap();
        db.rollback().await.unwrap();

        let mut rows = db
            .conn()
            .query("SELECT COUNT(*) FROM languages", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }

    #[tokio::test]
    async fn nested_begin_fails() {
        let db = test_db().await;
        db.begin().await.unwrap();
        assert!(db.begin().await.is_err());
        db.rollback().await.unwrap();
    }
}
