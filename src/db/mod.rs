use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{AppError, AppResult};

pub mod memory;
pub mod pinecone;

pub use memory::InMemoryVectorStore;
pub use pinecone::PineconeVectorStore;

pub type Metadata = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

/// Exact-match equality filter over record metadata.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetadataFilter {
    conditions: BTreeMap<String, Value>,
}

impl MetadataFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, metadata: &Metadata) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| metadata.get(field) == Some(expected))
    }

    /// Pinecone filter syntax: `{"field": {"$eq": value}}`.
    pub fn to_pinecone(&self) -> Value {
        let clauses: Map<String, Value> = self
            .conditions
            .iter()
            .map(|(field, value)| (field.clone(), json!({ "$eq": value })))
            .collect();
        Value::Object(clauses)
    }
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    fn dimension(&self) -> usize;

    /// Creates the backing collection when it does not exist yet.
    async fn ensure_collection(&self) -> AppResult<()>;

    /// Inserts or replaces the record stored under `record.id`.
    async fn upsert(&self, record: VectorRecord) -> AppResult<()>;

    /// Returns up to `top_k` records matching `filter`, ordered by similarity
    /// to `vector`.
    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> AppResult<Vec<QueryMatch>>;

    async fn fetch(&self, id: &str) -> AppResult<Option<VectorRecord>>;

    async fn health_check(&self) -> AppResult<()>;
}

pub fn check_dimension(expected: usize, values: &[f32]) -> AppResult<()> {
    if values.len() != expected {
        return Err(AppError::ValidationError(format!(
            "vector has {} dimensions, expected {}",
            values.len(),
            expected
        )));
    }
    Ok(())
}
