//! Shared test utilities for term-db and its dependents.

use crate::TermDb;
use crate::error::DatabaseError;
use crate::seed::VocabularySeed;
use crate::service::TermService;

/// An in-memory service seeded with the built-in vocabulary.
///
/// # Errors
///
/// Returns `DatabaseError` if the database can not be opened or seeded.
pub async fn seeded_memory_service() -> Result<TermService, DatabaseError> {
    let svc = TermService::from_db(TermDb::open_local(":memory:").await?);
    svc.seed_vocabulary(&VocabularySeed::builtin()?).await?;
    Ok(svc)
}
