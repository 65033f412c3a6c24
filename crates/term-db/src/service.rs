//! Service layer wrapping the database handle.
//!
//! `TermService` owns a `TermDb` and the write-time validation settings. All
//! repo methods are implemented as `impl TermService` blocks under `repos/`.

use crate::TermDb;
use crate::error::DatabaseError;

/// Entry point for every store operation.
///
/// Mutations validate their input with the rules in `term_core::validation`
/// before touching the database. Callers that need several writes to be
/// atomic wrap them in [`TermDb::begin`] / [`TermDb::commit`].
pub struct TermService {
    db: TermDb,
    enforce_language_rules: bool,
}

impl TermService {
    /// Open a local database and wrap it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = TermDb::open_local(db_path).await?;
        Ok(Self::from_db(db))
    }

    /// Create from an existing `TermDb`.
    #[must_use]
    pub const fn from_db(db: TermDb) -> Self {
        Self {
            db,
            enforce_language_rules: false,
        }
    }

    /// Also check translations against the per-language vocabulary rules.
    #[must_use]
    pub const fn with_language_rules(mut self, enforce: bool) -> Self {
        self.enforce_language_rules = enforce;
        self
    }

    #[must_use]
    pub const fn enforces_language_rules(&self) -> bool {
        self.enforce_language_rules
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &TermDb {
        &self.db
    }

    /// Run a `SELECT COUNT(*)`-style query and return the single integer.
    pub(crate) async fn count(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<u32, DatabaseError> {
        let mut rows = self.db.conn().query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let n = row.get::<i64>(0)?;
        u32::try_from(n).map_err(|_| DatabaseError::InvalidState(format!("count {n} out of range")))
    }
}
