//! Concept repository — concepts, their relations, and the representation cache.

use std::collections::HashMap;

use term_core::entities::{Concept, ConceptRef};
use term_core::repr::{RankedTerm, concept_repr};
use term_core::validation::{ConceptRelations, validate_concept_relations};
use tracing::debug;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, placeholders};
use crate::service::TermService;

/// SQLite's default bound-parameter limit is far above this; chunks keep
/// statements small for large imports.
const ID_CHUNK: usize = 500;

const SELECT_COLS: &str = "id, glossary_id, subject_field_id, broader_concept_id, repr_cache";

pub(crate) fn row_to_concept(row: &libsql::Row) -> Result<Concept, DatabaseError> {
    Ok(Concept {
        id: row.get::<i64>(0)?,
        glossary_id: row.get::<i64>(1)?,
        subject_field_id: row.get::<Option<i64>>(2)?,
        broader_concept_id: row.get::<Option<i64>>(3)?,
        related_concept_ids: Vec::new(),
        repr_cache: get_opt_string(row, 4)?,
    })
}

/// Relations to apply to one concept.
///
/// Subject field and broader concept replace the stored values. Related
/// concepts are added symmetrically and never removed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConceptRelationsUpdate {
    pub subject_field_id: Option<i64>,
    pub broader_concept_id: Option<i64>,
    pub related_concept_ids: Vec<i64>,
}

impl ConceptRelationsUpdate {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subject_field_id: None,
            broader_concept_id: None,
            related_concept_ids: Vec::new(),
        }
    }

    #[must_use]
    pub const fn subject_field(mut self, id: i64) -> Self {
        self.subject_field_id = Some(id);
        self
    }

    #[must_use]
    pub const fn broader_concept(mut self, id: i64) -> Self {
        self.broader_concept_id = Some(id);
        self
    }

    #[must_use]
    pub fn related(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.related_concept_ids.extend(ids);
        self
    }
}

impl TermService {
    /// # Errors
    ///
    /// Returns `DatabaseError` if the glossary does not exist.
    pub async fn create_concept(&self, glossary_id: i64) -> Result<Concept, DatabaseError> {
        self.db()
            .conn()
            .execute(
                "INSERT INTO concepts (glossary_id) VALUES (?1)",
                [glossary_id],
            )
            .await?;
        let id = self.db().last_insert_id();
        debug!(concept_id = id, glossary_id, "concept created");
        Ok(Concept {
            id,
            glossary_id,
            subject_field_id: None,
            broader_concept_id: None,
            related_concept_ids: Vec::new(),
            repr_cache: None,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if no concept has this id.
    pub async fn get_concept(&self, id: i64) -> Result<Concept, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM concepts WHERE id = ?1"),
                [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::not_found("concept", id))?;
        let mut concept = row_to_concept(&row)?;
        concept.related_concept_ids = self.related_concept_ids(id).await?;
        Ok(concept)
    }

    /// Concepts of a glossary ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_concepts(&self, glossary_id: i64) -> Result<Vec<Concept>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM concepts WHERE glossary_id = ?1 ORDER BY id"),
                [glossary_id],
            )
            .await?;
        let mut concepts = Vec::new();
        while let Some(row) = rows.next().await? {
            concepts.push(row_to_concept(&row)?);
        }
        for concept in &mut concepts {
            concept.related_concept_ids = self.related_concept_ids(concept.id).await?;
        }
        Ok(concepts)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn related_concept_ids(&self, concept_id: i64) -> Result<Vec<i64>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT related_concept_id FROM concept_related WHERE concept_id = ?1
                 ORDER BY related_concept_id",
                [concept_id],
            )
            .await?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next().await? {
            ids.push(row.get::<i64>(0)?);
        }
        Ok(ids)
    }

    /// Identity and glossary of each existing concept among `ids`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a query fails.
    pub async fn concept_refs(&self, ids: &[i64]) -> Result<HashMap<i64, ConceptRef>, DatabaseError> {
        let mut refs = HashMap::with_capacity(ids.len());
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "SELECT id, glossary_id FROM concepts WHERE id IN ({})",
                placeholders(1, chunk.len())
            );
            let params: Vec<libsql::Value> = chunk.iter().map(|id| (*id).into()).collect();
            let mut rows = self
                .db()
                .conn()
                .query(&sql, libsql::params_from_iter(params))
                .await?;
            while let Some(row) = rows.next().await? {
                let id = row.get::<i64>(0)?;
                refs.insert(
                    id,
                    ConceptRef {
                        id,
                        glossary_id: row.get::<i64>(1)?,
                    },
                );
            }
        }
        Ok(refs)
    }

    /// Validate and apply relations to a concept.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NotFound` if the concept or a target does not
    /// exist, and `DatabaseError::Validation` for a self-reference or a target
    /// in another glossary.
    pub async fn set_concept_relations(
        &self,
        concept_id: i64,
        update: &ConceptRelationsUpdate,
    ) -> Result<(), DatabaseError> {
        let mut ids = vec![concept_id];
        ids.extend(update.subject_field_id);
        ids.extend(update.broader_concept_id);
        ids.extend(&update.related_concept_ids);
        let refs = self.concept_refs(&ids).await?;

        let resolve = |id: i64| {
            refs.get(&id)
                .copied()
                .ok_or_else(|| DatabaseError::not_found("concept", id))
        };
        let concept = resolve(concept_id)?;
        let subject_field = update.subject_field_id.map(resolve).transpose()?;
        let broader_concept = update.broader_concept_id.map(resolve).transpose()?;
        let related = update
            .related_concept_ids
            .iter()
            .map(|id| resolve(*id))
            .collect::<Result<Vec<_>, _>>()?;

        validate_concept_relations(
            concept,
            &ConceptRelations {
                subject_field,
                broader_concept,
                related_concepts: &related,
            },
        )?;

        self.db()
            .conn()
            .execute(
                "UPDATE concepts SET subject_field_id = ?1, broader_concept_id = ?2 WHERE id = ?3",
                libsql::params![update.subject_field_id, update.broader_concept_id, concept_id],
            )
            .await?;

        for target in &update.related_concept_ids {
            self.db()
                .conn()
                .execute(
                    "INSERT INTO concept_related (concept_id, related_concept_id)
                     VALUES (?1, ?2), (?2, ?1) ON CONFLICT DO NOTHING",
                    libsql::params![concept_id, *target],
                )
                .await?;
        }
        debug!(
            concept_id,
            subject_field = ?update.subject_field_id,
            broader_concept = ?update.broader_concept_id,
            related = update.related_concept_ids.len(),
            "concept relations set"
        );
        Ok(())
    }

    /// Clear subject field and broader concept on every listed concept.
    ///
    /// These two relations are delete-protected, so this must run before the
    /// concepts can be deleted. Related concepts are left alone. Returns the
    /// number of concepts updated.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if an update fails.
    pub async fn detach_protected_relations(&self, concept_ids: &[i64]) -> Result<u64, DatabaseError> {
        let mut updated = 0;
        for chunk in concept_ids.chunks(ID_CHUNK) {
            let sql = format!(
                "UPDATE concepts SET subject_field_id = NULL, broader_concept_id = NULL
                 WHERE id IN ({})",
                placeholders(1, chunk.len())
            );
            let params: Vec<libsql::Value> = chunk.iter().map(|id| (*id).into()).collect();
            updated += self
                .db()
                .conn()
                .execute(&sql, libsql::params_from_iter(params))
                .await?;
        }
        Ok(updated)
    }

    /// Recompute the representation cache from the concept's source-language terms.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the concept does not exist or a query fails.
    pub async fn refresh_repr_cache(&self, concept_id: i64) -> Result<String, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT t.text, s.representation
                 FROM translations t
                 JOIN concepts c ON c.id = t.concept_id
                 JOIN glossaries g ON g.id = c.glossary_id
                 LEFT JOIN administrative_statuses s ON s.id = t.administrative_status_id
                 WHERE t.concept_id = ?1 AND t.language = g.source_language",
                [concept_id],
            )
            .await?;
        let mut terms: Vec<(String, Option<String>)> = Vec::new();
        while let Some(row) = rows.next().await? {
            terms.push((row.get::<String>(0)?, get_opt_string(&row, 1)?));
        }
        let ranked: Vec<RankedTerm<'_>> = terms
            .iter()
            .map(|(text, status)| RankedTerm {
                text,
                status_representation: status.as_deref(),
            })
            .collect();
        let repr = concept_repr(concept_id, &ranked);

        self.db()
            .conn()
            .execute(
                "UPDATE concepts SET repr_cache = ?1 WHERE id = ?2",
                libsql::params![repr.as_str(), concept_id],
            )
            .await?;
        Ok(repr)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use term_core::enums::ConceptRelation;
    use term_core::errors::ValidationError;

    use super::ConceptRelationsUpdate;
    use crate::error::DatabaseError;
    use crate::test_support::helpers::{test_concept, test_glossary, test_service};

    #[tokio::test]
    async fn related_concepts_are_symmetric() {
        let svc = test_service().await;
        let glossary = test_glossary(&svc, "Automotive").await;
        let a = test_concept(&svc, glossary.id).await;
        let b = test_concept(&svc, glossary.id).await;

        svc.set_concept_relations(a.id, &ConceptRelationsUpdate::new().related([b.id]))
            .await
            .unwrap();

        assert_eq!(svc.get_concept(a.id).await.unwrap().related_concept_ids, vec![b.id]);
        assert_eq!(svc.get_concept(b.id).await.unwrap().related_concept_ids, vec![a.id]);
    }

    #[tokio::test]
    async fn self_reference_rejected() {
        let svc = test_service().await;
        let glossary = test_glossary(&svc, "Automotive").await;
        let a = test_concept(&svc, glossary.id).await;

        let err = svc
            .set_concept_relations(a.id, &ConceptRelationsUpdate::new().broader_concept(a.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::SelfReference {
                relation: ConceptRelation::BroaderConcept,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn cross_glossary_rejected() {
        let svc = test_service().await;
        let first = test_glossary(&svc, "Automotive").await;
        let second = test_glossary(&svc, "Aviation").await;
        let a = test_concept(&svc, first.id).await;
        let b = test_concept(&svc, second.id).await;

        let err = svc
            .set_concept_relations(a.id, &ConceptRelationsUpdate::new().subject_field(b.id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::CrossGlossary { target_id, .. }) if target_id == b.id
        ));
        assert_eq!(svc.get_concept(a.id).await.unwrap().subject_field_id, None);
    }

    #[tokio::test]
    async fn protected_relation_blocks_delete_until_detached() {
        let svc = test_service().await;
        let glossary = test_glossary(&svc, "Automotive").await;
        let field = test_concept(&svc, glossary.id).await;
        let a = test_concept(&svc, glossary.id).await;
        let b = test_concept(&svc, glossary.id).await;
        svc.set_concept_relations(
            a.id,
            &ConceptRelationsUpdate::new()
                .subject_field(field.id)
                .broader_concept(b.id)
                .related([b.id]),
        )
        .await
        .unwrap();

        assert!(svc.delete_glossary(glossary.id).await.is_err());

        let detached = svc
            .detach_protected_relations(&[field.id, a.id, b.id])
            .await
            .unwrap();
        assert_eq!(detached, 3);
        assert!(svc.delete_glossary(glossary.id).await.unwrap());
        assert_eq!(svc.count_concepts(glossary.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_target_is_not_found() {
        let svc = test_service().await;
        let glossary = test_glossary(&svc, "Automotive").await;
        let a = test_concept(&svc, glossary.id).await;
        let err = svc
            .set_concept_relations(a.id, &ConceptRelationsUpdate::new().related([404]))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }
}
