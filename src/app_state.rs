use std::sync::Arc;

use crate::{
    config::{Config, VectorStoreBackend},
    db::{InMemoryVectorStore, PineconeVectorStore, VectorStore},
    errors::{AppError, AppResult},
    repositories::{VectorQuizAttemptRepository, VectorUserProfileRepository},
    services::{
        model_service::{OpenAiQuizGenerator, QuizGenerator},
        quiz_attempt_service::QuizAttemptService,
        quiz_service::QuizService,
        user_service::UserProfileService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizService>,
    pub quiz_attempt_service: Arc<QuizAttemptService>,
    pub user_profile_service: Arc<UserProfileService>,
    pub vector_store: Arc<dyn VectorStore>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the external clients described by `config` and makes sure the
    /// vector collection exists before serving traffic.
    pub async fn new(config: Config) -> AppResult<Self> {
        let vector_store: Arc<dyn VectorStore> = match config.vector_store_backend {
            VectorStoreBackend::Pinecone => {
                let pinecone = config.pinecone.as_ref().ok_or_else(|| {
                    AppError::ConfigError("Pinecone settings are missing".to_string())
                })?;
                Arc::new(PineconeVectorStore::new(pinecone, config.embedding_dimension)?)
            }
            VectorStoreBackend::Memory => {
                log::warn!("Using the in-memory vector store; data is lost on restart");
                Arc::new(InMemoryVectorStore::new(config.embedding_dimension))
            }
        };
        vector_store.ensure_collection().await?;

        let generator = Arc::new(OpenAiQuizGenerator::new(&config));

        Ok(Self::with_components(config, vector_store, generator))
    }

    pub fn with_components(
        config: Config,
        vector_store: Arc<dyn VectorStore>,
        generator: Arc<dyn QuizGenerator>,
    ) -> Self {
        let quiz_attempt_repository = Arc::new(VectorQuizAttemptRepository::new(vector_store.clone()));
        let quiz_attempt_service = Arc::new(QuizAttemptService::new(
            quiz_attempt_repository,
            config.embedding_dimension,
        ));

        let user_profile_repository = Arc::new(VectorUserProfileRepository::new(vector_store.clone()));
        let user_profile_service = Arc::new(UserProfileService::new(
            user_profile_repository,
            config.embedding_dimension,
        ));

        let quiz_service = Arc::new(QuizService::new(generator));

        Self {
            quiz_service,
            quiz_attempt_service,
            user_profile_service,
            vector_store,
            config: Arc::new(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::model_service::MockQuizGenerator;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[tokio::test]
    async fn test_new_with_memory_backend() {
        let state = AppState::new(Config::in_memory()).await.expect("memory backend needs no network");
        assert_eq!(state.vector_store.dimension(), 1024);
        assert!(state.vector_store.health_check().await.is_ok());
    }

    #[test]
    fn test_with_components_shares_config() {
        let store = Arc::new(InMemoryVectorStore::new(1024));
        let state = AppState::with_components(
            Config::in_memory(),
            store,
            Arc::new(MockQuizGenerator::new()),
        );
        assert_eq!(state.config.history_top_k, 50);
    }
}
