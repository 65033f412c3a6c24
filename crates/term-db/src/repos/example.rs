//! Context sentences and corpus examples attached to translations.

use term_core::entities::{ContextSentence, CorpusExample};

use crate::error::DatabaseError;
use crate::service::TermService;

impl TermService {
    /// Attach a context sentence. Returns `false` if the translation already
    /// had this exact sentence.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the translation does not exist.
    pub async fn add_context_sentence(
        &self,
        translation_id: i64,
        text: &str,
    ) -> Result<bool, DatabaseError> {
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO context_sentences (translation_id, text) VALUES (?1, ?2)
                 ON CONFLICT(translation_id, text) DO NOTHING",
                libsql::params![translation_id, text],
            )
            .await?;
        Ok(inserted > 0)
    }

    /// Attach a corpus example. Returns `false` if the translation already
    /// had an example at this address.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the translation does not exist.
    pub async fn add_corpus_example(
        &self,
        translation_id: i64,
        address: &str,
        description: &str,
    ) -> Result<bool, DatabaseError> {
        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO corpus_examples (translation_id, address, description) VALUES (?1, ?2, ?3)
                 ON CONFLICT(translation_id, address) DO NOTHING",
                libsql::params![translation_id, address, description],
            )
            .await?;
        Ok(inserted > 0)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_context_sentences(
        &self,
        translation_id: i64,
    ) -> Result<Vec<ContextSentence>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, translation_id, text FROM context_sentences
                 WHERE translation_id = ?1 ORDER BY id",
                [translation_id],
            )
            .await?;
        let mut sentences = Vec::new();
        while let Some(row) = rows.next().await? {
            sentences.push(ContextSentence {
                id: row.get::<i64>(0)?,
                translation_id: row.get::<i64>(1)?,
                text: row.get::<String>(2)?,
            });
        }
        Ok(sentences)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_corpus_examples(
        &self,
        translation_id: i64,
    ) -> Result<Vec<CorpusExample>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT id, translation_id, address, description FROM corpus_examples
                 WHERE translation_id = ?1 ORDER BY id",
                [translation_id],
            )
            .await?;
        let mut examples = Vec::new();
        while let Some(row) = rows.next().await? {
            examples.push(CorpusExample {
                id: row.get::<i64>(0)?,
                translation_id: row.get::<i64>(1)?,
                address: row.get::<String>(2)?,
                description: row.get::<String>(3)?,
            });
        }
        Ok(examples)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use term_core::entities::NewTranslation;

    use crate::test_support::helpers::{test_concept, test_glossary, test_service};

    #[tokio::test]
    async fn duplicates_are_ignored() {
        let svc = test_service().await;
        let vocab = svc.load_vocabulary().await.unwrap();
        let glossary = test_glossary(&svc, "Automotive").await;
        let concept = test_concept(&svc, glossary.id).await;
        let translation = svc
            .create_translation(&NewTranslation::new(concept.id, "en", "car"), &vocab)
            .await
            .unwrap();

        assert!(svc.add_context_sentence(translation.id, "The car stalled.").await.unwrap());
        assert!(!svc.add_context_sentence(translation.id, "The car stalled.").await.unwrap());
        assert!(
            svc.add_corpus_example(translation.id, "https://corpus.example.org/1", "Manual")
                .await
                .unwrap()
        );
        assert!(
            !svc.add_corpus_example(translation.id, "https://corpus.example.org/1", "Other")
                .await
                .unwrap()
        );

        assert_eq!(svc.list_context_sentences(translation.id).await.unwrap().len(), 1);
        let examples = svc.list_corpus_examples(translation.id).await.unwrap();
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].description, "Manual");
    }
}
