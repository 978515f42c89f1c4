use std::{env, str::FromStr};

use secrecy::SecretString;

use crate::errors::{AppError, AppResult};

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1024;
pub const DEFAULT_HISTORY_TOP_K: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VectorStoreBackend {
    Pinecone,
    Memory,
}

impl FromStr for VectorStoreBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pinecone" => Ok(VectorStoreBackend::Pinecone),
            "memory" => Ok(VectorStoreBackend::Memory),
            other => Err(AppError::ConfigError(format!(
                "Unknown VECTOR_STORE_BACKEND '{}', expected 'pinecone' or 'memory'",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PineconeConfig {
    pub api_key: SecretString,
    pub index_name: String,
    pub cloud: String,
    pub region: String,
    pub control_plane_url: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub vector_store_backend: VectorStoreBackend,
    pub pinecone: Option<PineconeConfig>,
    pub embedding_dimension: usize,
    pub history_top_k: usize,
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub quiz_model: String,
    pub web_server_host: String,
    pub web_server_port: u16,
}

fn required(name: &str) -> AppResult<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::ConfigError(format!("{} must be set", name)))
}

/// Unset means the default. Anything else must be a positive integer.
fn history_top_k(value: Option<&str>) -> AppResult<usize> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(DEFAULT_HISTORY_TOP_K);
    };

    match value.parse::<usize>() {
        Ok(top_k) if top_k >= 1 => Ok(top_k),
        _ => Err(AppError::ConfigError(format!(
            "HISTORY_TOP_K must be a positive integer, got '{}'",
            value
        ))),
    }
}

impl Config {
    /// Reads configuration from the process environment. The Pinecone
    /// credentials and the model API key have no defaults.
    pub fn from_env() -> AppResult<Self> {
        let vector_store_backend = env::var("VECTOR_STORE_BACKEND")
            .unwrap_or_else(|_| "pinecone".to_string())
            .parse::<VectorStoreBackend>()?;

        let pinecone = match vector_store_backend {
            VectorStoreBackend::Pinecone => Some(PineconeConfig {
                api_key: SecretString::from(required("PINECONE_API_KEY")?),
                index_name: required("PINECONE_INDEX_NAME")?,
                cloud: env::var("PINECONE_CLOUD").unwrap_or_else(|_| "aws".to_string()),
                region: env::var("PINECONE_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
                control_plane_url: env::var("PINECONE_CONTROL_PLANE_URL")
                    .unwrap_or_else(|_| "https://api.pinecone.io".to_string()),
            }),
            VectorStoreBackend::Memory => None,
        };

        Ok(Self {
            vector_store_backend,
            pinecone,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            history_top_k: history_top_k(env::var("HISTORY_TOP_K").ok().as_deref())?,
            openai_api_key: SecretString::from(required("OPENAI_API_KEY")?),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            quiz_model: env::var("QUIZ_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
        })
    }

    /// Configuration for an in-memory deployment, used by tests and local runs
    /// that should not reach any external service.
    pub fn in_memory() -> Self {
        Self {
            vector_store_backend: VectorStoreBackend::Memory,
            pinecone: None,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
            history_top_k: DEFAULT_HISTORY_TOP_K,
            openai_api_key: SecretString::from("unused".to_string()),
            openai_api_base: "http://127.0.0.1:0/v1".to_string(),
            quiz_model: "test-model".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8000,
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            vector_store_backend: VectorStoreBackend::Pinecone,
            pinecone: Some(PineconeConfig {
                api_key: SecretString::from("test_pinecone_key".to_string()),
                index_name: "edututor-test".to_string(),
                cloud: "aws".to_string(),
                region: "us-east-1".to_string(),
                control_plane_url: "http://127.0.0.1:9".to_string(),
            }),
            ..Self::in_memory()
        }
    }
}
