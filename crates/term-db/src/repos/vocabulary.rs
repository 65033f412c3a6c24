//! Vocabulary repository — seeding and snapshot loading.

use term_core::entities::{LanguageRules, VocabularyTerm};
use term_core::enums::VocabularyKind;
use term_core::vocabulary::{Vocabulary, VocabularyLookup};
use tracing::{info, warn};

use crate::error::DatabaseError;
use crate::helpers::{get_flag, vocabulary_table};
use crate::seed::{TermSeed, VocabularySeed};
use crate::service::TermService;

fn row_to_term(kind: VocabularyKind, row: &libsql::Row) -> Result<VocabularyTerm, DatabaseError> {
    Ok(VocabularyTerm {
        kind,
        id: row.get::<i64>(0)?,
        name: row.get::<String>(1)?,
        representation: row.get::<String>(2)?,
        description: row.get::<String>(3)?,
        allows_reason: get_flag(row, 4)?,
    })
}

impl TermService {
    /// Insert every term and language rule of a seed.
    ///
    /// Terms whose representation already exists are left alone, so seeding is
    /// repeatable. Returns the number of newly inserted terms.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Seed` if a language rule names an unknown term;
    /// nothing is written in that case.
    pub async fn seed_vocabulary(&self, seed: &VocabularySeed) -> Result<u32, DatabaseError> {
        self.db().begin().await?;
        match self.seed_vocabulary_inner(seed).await {
            Ok(inserted) => {
                self.db().commit().await?;
                info!(inserted, "vocabulary seeded");
                Ok(inserted)
            }
            Err(error) => {
                if let Err(rollback_error) = self.db().rollback().await {
                    warn!(%rollback_error, "vocabulary seed rollback failed");
                }
                Err(error)
            }
        }
    }

    async fn seed_vocabulary_inner(&self, seed: &VocabularySeed) -> Result<u32, DatabaseError> {
        let conn = self.db().conn();
        let mut inserted = 0u64;

        for language in &seed.languages {
            inserted += conn
                .execute(
                    "INSERT INTO languages (code, name, description) VALUES (?1, ?2, ?3)
                     ON CONFLICT(code) DO NOTHING",
                    libsql::params![
                        language.code.as_str(),
                        language.name.as_str(),
                        language.description.as_str()
                    ],
                )
                .await?;
        }

        let plain = [
            (VocabularyKind::PartOfSpeech, &seed.parts_of_speech),
            (VocabularyKind::GrammaticalGender, &seed.grammatical_genders),
            (VocabularyKind::GrammaticalNumber, &seed.grammatical_numbers),
            (VocabularyKind::ExternalLinkType, &seed.external_link_types),
        ];
        for (kind, terms) in plain {
            inserted += self.insert_plain_terms(kind, terms).await?;
        }

        for status in &seed.administrative_statuses {
            inserted += conn
                .execute(
                    "INSERT INTO administrative_statuses (name, representation, description, allows_reason)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(representation) DO NOTHING",
                    libsql::params![
                        status.name.as_str(),
                        status.representation.as_str(),
                        status.description.as_str(),
                        i64::from(status.allows_reason)
                    ],
                )
                .await?;
        }

        for reason in &seed.administrative_status_reasons {
            inserted += conn
                .execute(
                    "INSERT INTO administrative_status_reasons (name, representation, description)
                     VALUES (?1, ?2, ?3)
                     ON CONFLICT(representation) DO NOTHING",
                    libsql::params![
                        reason.name.as_str(),
                        reason.representation.as_str(),
                        reason.description.as_str()
                    ],
                )
                .await?;
        }

        // Rules reference terms by representation; resolve against what is now stored.
        let vocabulary = self.load_vocabulary().await?;
        let lookup = |kind: VocabularyKind, representation: &str| {
            vocabulary
                .resolve(kind, representation)
                .map(|t| (t.id, t.representation.clone()))
                .ok_or_else(|| {
                    DatabaseError::Seed(format!("unknown {kind} '{representation}' in seed"))
                })
        };

        for reason in &seed.administrative_status_reasons {
            let (reason_id, _) =
                lookup(VocabularyKind::AdministrativeStatusReason, &reason.representation)?;
            for code in &reason.languages {
                let (_, code) = lookup(VocabularyKind::Language, code)?;
                conn.execute(
                    "INSERT INTO administrative_status_reason_languages
                         (administrative_status_reason_id, language)
                     VALUES (?1, ?2) ON CONFLICT DO NOTHING",
                    libsql::params![reason_id, code],
                )
                .await?;
            }
        }

        for rules in &seed.language_rules {
            let (_, code) = lookup(VocabularyKind::Language, &rules.language)?;
            for pos in &rules.parts_of_speech {
                let (pos_id, _) = lookup(VocabularyKind::PartOfSpeech, &pos.part_of_speech)?;
                conn.execute(
                    "INSERT INTO part_of_speech_for_language
                         (language, part_of_speech_id, allows_grammatical_gender, allows_grammatical_number)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(language, part_of_speech_id) DO UPDATE SET
                         allows_grammatical_gender = excluded.allows_grammatical_gender,
                         allows_grammatical_number = excluded.allows_grammatical_number",
                    libsql::params![
                        code.as_str(),
                        pos_id,
                        i64::from(pos.gender),
                        i64::from(pos.number)
                    ],
                )
                .await?;
            }
            for gender in &rules.genders {
                let (gender_id, _) = lookup(VocabularyKind::GrammaticalGender, gender)?;
                conn.execute(
                    "INSERT INTO language_grammatical_genders (language, grammatical_gender_id)
                     VALUES (?1, ?2) ON CONFLICT DO NOTHING",
                    libsql::params![code.as_str(), gender_id],
                )
                .await?;
            }
            for number in &rules.numbers {
                let (number_id, _) = lookup(VocabularyKind::GrammaticalNumber, number)?;
                conn.execute(
                    "INSERT INTO language_grammatical_numbers (language, grammatical_number_id)
                     VALUES (?1, ?2) ON CONFLICT DO NOTHING",
                    libsql::params![code.as_str(), number_id],
                )
                .await?;
            }
        }

        u32::try_from(inserted)
            .map_err(|_| DatabaseError::InvalidState(format!("{inserted} inserted terms")))
    }

    async fn insert_plain_terms(
        &self,
        kind: VocabularyKind,
        terms: &[TermSeed],
    ) -> Result<u64, DatabaseError> {
        let (table, _) = vocabulary_table(kind);
        let sql = format!(
            "INSERT INTO {table} (name, representation, description) VALUES (?1, ?2, ?3)
             ON CONFLICT(representation) DO NOTHING"
        );
        let mut inserted = 0;
        for term in terms {
            inserted += self
                .db()
                .conn()
                .execute(
                    &sql,
                    libsql::params![
                        term.name.as_str(),
                        term.representation.as_str(),
                        term.description.as_str()
                    ],
                )
                .await?;
        }
        Ok(inserted)
    }

    /// All terms of one kind, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_vocabulary(
        &self,
        kind: VocabularyKind,
    ) -> Result<Vec<VocabularyTerm>, DatabaseError> {
        let (table, representation) = vocabulary_table(kind);
        let allows_reason = if kind == VocabularyKind::AdministrativeStatus {
            "allows_reason"
        } else {
            "0"
        };
        let sql = format!(
            "SELECT id, name, {representation}, description, {allows_reason} FROM {table} ORDER BY id"
        );
        let mut rows = self.db().conn().query(&sql, ()).await?;
        let mut terms = Vec::new();
        while let Some(row) = rows.next().await? {
            terms.push(row_to_term(kind, &row)?);
        }
        Ok(terms)
    }

    /// Load every vocabulary term and language rule into memory.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if any query fails.
    pub async fn load_vocabulary(&self) -> Result<Vocabulary, DatabaseError> {
        let mut vocabulary = Vocabulary::new();
        for kind in VocabularyKind::ALL {
            for term in self.list_vocabulary(kind).await? {
                vocabulary.insert(term);
            }
        }

        let mut rules: std::collections::BTreeMap<String, LanguageRules> =
            std::collections::BTreeMap::new();
        let conn = self.db().conn();

        let mut rows = conn
            .query(
                "SELECT language, part_of_speech_id, allows_grammatical_gender, allows_grammatical_number
                 FROM part_of_speech_for_language",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            let allowance = term_core::entities::GrammarAllowance {
                gender: get_flag(&row, 2)?,
                number: get_flag(&row, 3)?,
            };
            rules
                .entry(row.get::<String>(0)?)
                .or_default()
                .parts_of_speech
                .insert(row.get::<i64>(1)?, allowance);
        }

        let mut rows = conn
            .query(
                "SELECT language, grammatical_gender_id FROM language_grammatical_genders",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            rules
                .entry(row.get::<String>(0)?)
                .or_default()
                .grammatical_genders
                .insert(row.get::<i64>(1)?);
        }

        let mut rows = conn
            .query(
                "SELECT language, grammatical_number_id FROM language_grammatical_numbers",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            rules
                .entry(row.get::<String>(0)?)
                .or_default()
                .grammatical_numbers
                .insert(row.get::<i64>(1)?);
        }

        let mut rows = conn
            .query(
                "SELECT language, administrative_status_reason_id
                 FROM administrative_status_reason_languages",
                (),
            )
            .await?;
        while let Some(row) = rows.next().await? {
            rules
                .entry(row.get::<String>(0)?)
                .or_default()
                .administrative_status_reasons
                .insert(row.get::<i64>(1)?);
        }

        for (code, language_rules) in rules {
            vocabulary.set_language_rules(&code, language_rules);
        }
        Ok(vocabulary)
    }
}
