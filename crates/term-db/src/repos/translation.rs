//! Translation repository.

use term_core::entities::{NewTranslation, Translation};
use term_core::enums::VocabularyKind;
use term_core::validation::validate_translation;
use term_core::vocabulary::VocabularyLookup;

use crate::error::DatabaseError;
use crate::helpers::{get_flag, get_opt_string};
use crate::service::TermService;

pub(crate) const SELECT_COLS: &str = "t.id, t.concept_id, t.language, t.text, t.part_of_speech_id, \
     t.grammatical_gender_id, t.grammatical_number_id, t.administrative_status_id, \
     t.administrative_status_reason_id, t.note, t.finalized";

pub(crate) fn row_to_translation(row: &libsql::Row) -> Result<Translation, DatabaseError> {
    Ok(Translation {
        id: row.get::<i64>(0)?,
        concept_id: row.get::<i64>(1)?,
        language: row.get::<String>(2)?,
        text: row.get::<String>(3)?,
        part_of_speech_id: row.get::<Option<i64>>(4)?,
        grammatical_gender_id: row.get::<Option<i64>>(5)?,
        grammatical_number_id: row.get::<Option<i64>>(6)?,
        administrative_status_id: row.get::<Option<i64>>(7)?,
        administrative_status_reason_id: row.get::<Option<i64>>(8)?,
        note: get_opt_string(row, 9)?,
        finalized: get_flag(row, 10)?,
    })
}

impl TermService {
    /// Validate and insert a translation, then refresh its concept's
    /// representation cache.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if an attribute rule is broken,
    /// `DatabaseError::NotFound` for an unknown language, and
    /// `DatabaseError::LibSql` if the concept does not exist.
    pub async fn create_translation(
        &self,
        translation: &NewTranslation,
        vocabulary: &impl VocabularyLookup,
    ) -> Result<Translation, DatabaseError> {
        validate_translation(translation, vocabulary, self.enforces_language_rules())?;
        let language = vocabulary
            .resolve(VocabularyKind::Language, &translation.language)
            .ok_or_else(|| DatabaseError::not_found("language", &translation.language))?
            .representation
            .clone();

        self.db()
            .conn()
            .execute(
                "INSERT INTO translations (concept_id, language, text, part_of_speech_id,
                     grammatical_gender_id, grammatical_number_id, administrative_status_id,
                     administrative_status_reason_id, note, finalized)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                libsql::params![
                    translation.concept_id,
                    language.as_str(),
                    translation.text.as_str(),
                    translation.part_of_speech_id,
                    translation.grammatical_gender_id,
                    translation.grammatical_number_id,
                    translation.administrative_status_id,
                    translation.administrative_status_reason_id,
                    translation.note.as_deref(),
                    i64::from(translation.finalized)
                ],
            )
            .await?;
        let id = self.db().last_insert_id();

        self.refresh_repr_cache(translation.concept_id).await?;

        let mut stored = translation.clone();
        stored.language = language;
        Ok(stored.into_translation(id))
    }

    /// Translations of a concept ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_translations(&self, concept_id: i64) -> Result<Vec<Translation>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM translations t WHERE t.concept_id = ?1 ORDER BY t.id"),
                [concept_id],
            )
            .await?;
        let mut translations = Vec::new();
        while let Some(row) = rows.next().await? {
            translations.push(row_to_translation(&row)?);
        }
        Ok(translations)
    }
}
