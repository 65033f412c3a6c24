//! External resource repository.

use term_core::entities::{ExternalResource, NewExternalResource};

use crate::error::DatabaseError;
use crate::helpers::get_opt_string;
use crate::service::TermService;

pub(crate) const SELECT_COLS: &str =
    "r.id, r.concept_id, r.language, r.address, r.link_type_id, r.description";

pub(crate) fn row_to_resource(row: &libsql::Row) -> Result<ExternalResource, DatabaseError> {
    Ok(ExternalResource {
        id: row.get::<i64>(0)?,
        concept_id: row.get::<i64>(1)?,
        language: get_opt_string(row, 2)?,
        address: row.get::<String>(3)?,
        link_type_id: row.get::<i64>(4)?,
        description: row.get::<String>(5)?,
    })
}

impl TermService {
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the concept, language or link type
    /// does not exist.
    pub async fn create_external_resource(
        &self,
        resource: &NewExternalResource,
    ) -> Result<ExternalResource, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO external_resources (concept_id, language, address, link_type_id, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                libsql::params![
                    resource.concept_id,
                    resource.language.as_deref(),
                    resource.address.as_str(),
                    resource.link_type_id,
                    resource.description.as_str()
                ],
            )
            .await?;
        Ok(ExternalResource {
            id: self.db().last_insert_id(),
            concept_id: resource.concept_id,
            language: resource.language.clone(),
            address: resource.address.clone(),
            link_type_id: resource.link_type_id,
            description: resource.description.clone(),
        })
    }

    /// Resources of a concept ordered by id, concept-level ones included.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_external_resources(
        &self,
        concept_id: i64,
    ) -> Result<Vec<ExternalResource>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "SELECT {SELECT_COLS} FROM external_resources r WHERE r.concept_id = ?1 ORDER BY r.id"
                ),
                [concept_id],
            )
            .await?;
        let mut resources = Vec::new();
        while let Some(row) = rows.next().await? {
            resources.push(row_to_resource(&row)?);
        }
        Ok(resources)
    }
}
