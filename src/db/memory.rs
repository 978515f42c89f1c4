use std::{cmp::Ordering, collections::HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    db::{check_dimension, MetadataFilter, QueryMatch, VectorRecord, VectorStore},
    errors::AppResult,
};

/// Process-local vector store with the same contract as the managed one.
pub struct InMemoryVectorStore {
    dimension: usize,
    records: RwLock<HashMap<String, VectorRecord>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn ensure_collection(&self) -> AppResult<()> {
        Ok(())
    }

    async fn upsert(&self, record: VectorRecord) -> AppResult<()> {
        check_dimension(self.dimension, &record.values)?;
        let mut records = self.records.write().await;
        records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> AppResult<Vec<QueryMatch>> {
        check_dimension(self.dimension, vector)?;
        let records = self.records.read().await;

        let mut matches: Vec<QueryMatch> = records
            .values()
            .filter(|record| filter.matches(&record.metadata))
            .map(|record| QueryMatch {
                id: record.id.clone(),
                score: cosine_similarity(vector, &record.values),
                metadata: record.metadata.clone(),
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
        matches.truncate(top_k);

        Ok(matches)
    }

    async fn fetch(&self, id: &str) -> AppResult<Option<VectorRecord>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}
