//! Bulk loaders and the concept cursor used by the TBX exporter.
//!
//! Loaders return every row for a set of glossaries; filtering and grouping
//! happen in the exporter. Concepts are streamed through [`ConceptCursor`]
//! so an export never holds the whole concept list.

use term_core::entities::{
    Concept, ConceptInLanguage, ContextSentence, CorpusExample, Definition, ExternalResource,
    Translation,
};

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, placeholders};
use crate::repos::concept::row_to_concept;
use crate::repos::{definition, resource, summary, translation};
use crate::service::TermService;

/// A concept as the exporter sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportConcept {
    pub concept: Concept,
    /// Representation cache of the subject field concept, if any.
    pub subject_field_label: Option<String>,
}

/// Forward-only cursor over the concepts of a glossary set, ordered by
/// (glossary, id).
pub struct ConceptCursor {
    rows: libsql::Rows,
}

impl ConceptCursor {
    /// Pull the next concept, or `None` once exhausted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if reading the row fails.
    pub async fn next(&mut self) -> Result<Option<ExportConcept>, DatabaseError> {
        let Some(row) = self.rows.next().await? else {
            return Ok(None);
        };
        let mut concept = row_to_concept(&row)?;
        concept.related_concept_ids = parse_id_list(get_opt_string(&row, 5)?.as_deref())?;
        Ok(Some(ExportConcept {
            concept,
            subject_field_label: get_opt_string(&row, 6)?,
        }))
    }
}

fn parse_id_list(list: Option<&str>) -> Result<Vec<i64>, DatabaseError> {
    let Some(list) = list else {
        return Ok(Vec::new());
    };
    let mut ids = list
        .split(',')
        .map(|id| {
            id.trim()
                .parse::<i64>()
                .map_err(|e| DatabaseError::InvalidState(format!("related id '{id}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_unstable();
    Ok(ids)
}

fn glossary_params(glossary_ids: &[i64]) -> Vec<libsql::Value> {
    glossary_ids.iter().map(|id| (*id).into()).collect()
}

impl TermService {
    /// Open a cursor over every concept of the given glossaries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_concepts(&self, glossary_ids: &[i64]) -> Result<ConceptCursor, DatabaseError> {
        let sql = format!(
            "SELECT c.id, c.glossary_id, c.subject_field_id, c.broader_concept_id, c.repr_cache,
                    (SELECT group_concat(r.related_concept_id) FROM concept_related r
                     WHERE r.concept_id = c.id),
                    sf.repr_cache
             FROM concepts c
             LEFT JOIN concepts sf ON sf.id = c.subject_field_id
             WHERE c.glossary_id IN ({})
             ORDER BY c.glossary_id, c.id",
            placeholders(1, glossary_ids.len())
        );
        let rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        Ok(ConceptCursor { rows })
    }

    /// Whether any concept of the glossaries has related concepts.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_uses_related_concepts(
        &self,
        glossary_ids: &[i64],
    ) -> Result<bool, DatabaseError> {
        let sql = format!(
            "SELECT COUNT(*) FROM concept_related r JOIN concepts c ON c.id = r.related_concept_id
             WHERE c.glossary_id IN ({})",
            placeholders(1, glossary_ids.len())
        );
        let n = self
            .count(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        Ok(n > 0)
    }

    /// Every translation of the glossaries, ordered by (concept, language, id).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_translations(
        &self,
        glossary_ids: &[i64],
    ) -> Result<Vec<Translation>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM translations t JOIN concepts c ON c.id = t.concept_id
             WHERE c.glossary_id IN ({}) ORDER BY t.concept_id, t.language, t.id",
            translation::SELECT_COLS,
            placeholders(1, glossary_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(translation::row_to_translation(&row)?);
        }
        Ok(out)
    }

    /// Every definition of the glossaries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_definitions(
        &self,
        glossary_ids: &[i64],
    ) -> Result<Vec<Definition>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM definitions d JOIN concepts c ON c.id = d.concept_id
             WHERE c.glossary_id IN ({}) ORDER BY d.concept_id, d.language, d.id",
            definition::SELECT_COLS,
            placeholders(1, glossary_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(definition::row_to_definition(&row)?);
        }
        Ok(out)
    }

    /// Every external resource of the glossaries, concept-level ones included.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_resources(
        &self,
        glossary_ids: &[i64],
    ) -> Result<Vec<ExternalResource>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM external_resources r JOIN concepts c ON c.id = r.concept_id
             WHERE c.glossary_id IN ({}) ORDER BY r.concept_id, r.language, r.id",
            resource::SELECT_COLS,
            placeholders(1, glossary_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(resource::row_to_resource(&row)?);
        }
        Ok(out)
    }

    /// Every per-language summary of the glossaries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_summaries(
        &self,
        glossary_ids: &[i64],
    ) -> Result<Vec<ConceptInLanguage>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM concepts_in_language s JOIN concepts c ON c.id = s.concept_id
             WHERE c.glossary_id IN ({}) ORDER BY s.concept_id, s.language",
            summary::SELECT_COLS,
            placeholders(1, glossary_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(summary::row_to_summary(&row)?);
        }
        Ok(out)
    }

    /// Context sentences of every translation in the glossaries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_context_sentences(
        &self,
        glossary_ids: &[i64],
    ) -> Result<Vec<ContextSentence>, DatabaseError> {
        let sql = format!(
            "SELECT cs.id, cs.translation_id, cs.text FROM context_sentences cs
             JOIN translations t ON t.id = cs.translation_id
             JOIN concepts c ON c.id = t.concept_id
             WHERE c.glossary_id IN ({}) ORDER BY cs.translation_id, cs.id",
            placeholders(1, glossary_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(ContextSentence {
                id: row.get::<i64>(0)?,
                translation_id: row.get::<i64>(1)?,
                text: row.get::<String>(2)?,
            });
        }
        Ok(out)
    }

    /// Corpus examples of every translation in the glossaries.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn export_corpus_examples(
        &self,
        glossary_ids: &[i64],
    ) -> Result<Vec<CorpusExample>, DatabaseError> {
        let sql = format!(
            "SELECT ce.id, ce.translation_id, ce.address, ce.description FROM corpus_examples ce
             JOIN translations t ON t.id = ce.translation_id
             JOIN concepts c ON c.id = t.concept_id
             WHERE c.glossary_id IN ({}) ORDER BY ce.translation_id, ce.id",
            placeholders(1, glossary_ids.len())
        );
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(glossary_params(glossary_ids)))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(CorpusExample {
                id: row.get::<i64>(0)?,
                translation_id: row.get::<i64>(1)?,
                address: row.get::<String>(2)?,
                description: row.get::<String>(3)?,
            });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use term_core::entities::NewTranslation;

    use super::parse_id_list;
    use crate::repos::concept::ConceptRelationsUpdate;
    use crate::test_support::helpers::{test_concept, test_glossary, test_service};

    #[test]
    fn id_list_parses_group_concat() {
        assert_eq!(parse_id_list(Some("7,3,12")).unwrap(), vec![3, 7, 12]);
        assert!(parse_id_list(None).unwrap().is_empty());
        assert!(parse_id_list(Some("7,x")).is_err());
    }

    #[tokio::test]
    async fn cursor_orders_by_glossary_then_id() {
        let svc = test_service().await;
        let first = test_glossary(&svc, "Automotive").await;
        let second = test_glossary(&svc, "Aviation").await;
        let b1 = test_concept(&svc, second.id).await;
        let a1 = test_concept(&svc, first.id).await;
        let a2 = test_concept(&svc, first.id).await;
        svc.set_concept_relations(
            a2.id,
            &ConceptRelationsUpdate::new().subject_field(a1.id).related([a1.id]),
        )
        .await
        .unwrap();
        let vocab = svc.load_vocabulary().await.unwrap();
        svc.create_translation(&NewTranslation::new(a1.id, "en", "engine"), &vocab)
            .await
            .unwrap();

        let mut cursor = svc.export_concepts(&[second.id, first.id]).await.unwrap();
        let mut seen = Vec::new();
        while let Some(item) = cursor.next().await.unwrap() {
            seen.push(item);
        }
        let ids: Vec<_> = seen.iter().map(|c| c.concept.id).collect();
        assert_eq!(ids, vec![a1.id, a2.id, b1.id]);
        assert_eq!(seen[1].concept.related_concept_ids, vec![a1.id]);
        assert_eq!(
            seen[1].subject_field_label.as_deref(),
            Some(format!("#{}: engine", a1.id).as_str())
        );
        assert!(svc.export_uses_related_concepts(&[first.id]).await.unwrap());
        assert!(!svc.export_uses_related_concepts(&[second.id]).await.unwrap());
    }
}
