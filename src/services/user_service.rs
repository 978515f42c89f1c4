use std::sync::Arc;

use validator::Validate;

use crate::{
    db::check_dimension,
    errors::{AppError, AppResult},
    models::{domain::UserProfile, dto::request::UpsertProfileRequest},
    repositories::UserProfileRepository,
};

/// Attempt history is selected by this key, so profiles may not carry it.
const RESERVED_METADATA_KEY: &str = "user_id";

pub struct UserProfileService {
    repository: Arc<dyn UserProfileRepository>,
    embedding_dimension: usize,
}

impl UserProfileService {
    pub fn new(repository: Arc<dyn UserProfileRepository>, embedding_dimension: usize) -> Self {
        Self {
            repository,
            embedding_dimension,
        }
    }

    pub async fn store_profile(
        &self,
        user_id: &str,
        request: UpsertProfileRequest,
    ) -> AppResult<UserProfile> {
        if user_id.trim().is_empty() {
            return Err(AppError::ValidationError("user_id must not be empty".to_string()));
        }
        request.validate()?;
        if request.metadata.contains_key(RESERVED_METADATA_KEY) {
            return Err(AppError::ValidationError(format!(
                "metadata key '{}' is reserved for quiz attempts",
                RESERVED_METADATA_KEY
            )));
        }
        check_dimension(self.embedding_dimension, &request.embedding)?;

        log::info!("Storing profile embedding for user '{}'", user_id);
        self.repository
            .upsert(UserProfile {
                user_id: user_id.to_string(),
                embedding: request.embedding,
                metadata: request.metadata,
            })
            .await
    }

    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        self.repository
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for user '{}' not found", user_id)))
    }
}
