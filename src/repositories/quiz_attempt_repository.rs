use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    db::{MetadataFilter, VectorRecord, VectorStore},
    errors::AppResult,
    models::domain::{quiz_attempt::QuizAttempt, HistoryEntry},
};

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt>;
    async fn find_by_user(&self, user_id: &str, top_k: usize) -> AppResult<Vec<HistoryEntry>>;
}

/// Stores attempts as vector records: the embedding is the vector and every
/// other field travels as metadata.
pub struct VectorQuizAttemptRepository {
    store: Arc<dyn VectorStore>,
}

impl VectorQuizAttemptRepository {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QuizAttemptRepository for VectorQuizAttemptRepository {
    async fn create(&self, attempt: QuizAttempt) -> AppResult<QuizAttempt> {
        let record = VectorRecord {
            id: attempt.id.clone(),
            values: attempt.embedding.clone(),
            metadata: attempt.metadata(),
        };
        self.store.upsert(record).await?;
        Ok(attempt)
    }

    async fn find_by_user(&self, user_id: &str, top_k: usize) -> AppResult<Vec<HistoryEntry>> {
        // The query vector is irrelevant here; only the filter selects records.
        let query_vector = vec![0.0; self.store.dimension()];
        let filter = MetadataFilter::new().equals("user_id", user_id);

        let matches = self.store.query(&query_vector, &filter, top_k).await?;
        Ok(matches
            .iter()
            .map(|m| HistoryEntry::from_metadata(&m.metadata))
            .collect())
    }
}
