use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    db::{VectorRecord, VectorStore},
    errors::AppResult,
    models::domain::UserProfile,
};

#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    async fn upsert(&self, profile: UserProfile) -> AppResult<UserProfile>;
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<UserProfile>>;
}

pub struct VectorUserProfileRepository {
    store: Arc<dyn VectorStore>,
}

impl VectorUserProfileRepository {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl UserProfileRepository for VectorUserProfileRepository {
    async fn upsert(&self, profile: UserProfile) -> AppResult<UserProfile> {
        let record = VectorRecord {
            id: UserProfile::vector_id(&profile.user_id),
            values: profile.embedding.clone(),
            metadata: profile.metadata.clone(),
        };
        self.store.upsert(record).await?;
        Ok(profile)
    }

    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let record = self.store.fetch(&UserProfile::vector_id(user_id)).await?;
        Ok(record.map(|record| UserProfile {
            user_id: user_id.to_string(),
            embedding: record.values,
            metadata: record.metadata,
        }))
    }
}
