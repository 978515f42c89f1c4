use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::OnceCell;

use crate::{
    config::PineconeConfig,
    db::{check_dimension, MetadataFilter, QueryMatch, VectorRecord, VectorStore},
    errors::{AppError, AppResult},
};

const API_VERSION: &str = "2024-10";
const METRIC: &str = "cosine";

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexDescription>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    name: String,
    #[serde(default)]
    host: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct FetchResponse {
    #[serde(default)]
    vectors: HashMap<String, VectorRecord>,
}

/// Client for a Pinecone serverless index. Control-plane calls go to
/// `control_plane_url`; data-plane calls go to the index host, resolved once
/// and cached.
pub struct PineconeVectorStore {
    http: Client,
    api_key: SecretString,
    index_name: String,
    cloud: String,
    region: String,
    control_plane_url: String,
    dimension: usize,
    host: OnceCell<String>,
}

impl PineconeVectorStore {
    pub fn new(config: &PineconeConfig, dimension: usize) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            index_name: config.index_name.clone(),
            cloud: config.cloud.clone(),
            region: config.region.clone(),
            control_plane_url: config.control_plane_url.trim_end_matches('/').to_string(),
            dimension,
            host: OnceCell::new(),
        })
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("Api-Key", self.api_key.expose_secret())
            .header("X-Pinecone-API-Version", API_VERSION)
    }

    async fn describe_index(&self) -> AppResult<IndexDescription> {
        let url = format!("{}/indexes/{}", self.control_plane_url, self.index_name);
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let response = ensure_success(response, "describe index").await?;
        Ok(response.json().await?)
    }

    async fn data_plane_url(&self, path: &str) -> AppResult<String> {
        let host = self
            .host
            .get_or_try_init(|| async {
                self.describe_index().await?.host.ok_or_else(|| {
                    AppError::VectorStoreError(format!(
                        "Index '{}' has no data plane host yet",
                        self.index_name
                    ))
                })
            })
            .await?;
        Ok(data_plane_url(host, path))
    }
}

fn data_plane_url(host: &str, path: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        format!("{}{}", host.trim_end_matches('/'), path)
    } else {
        format!("https://{}{}", host.trim_end_matches('/'), path)
    }
}

async fn ensure_success(response: Response, operation: &str) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<unreadable body>".to_string());
    Err(AppError::VectorStoreError(format!(
        "Pinecone {} failed with {}: {}",
        operation, status, body
    )))
}

#[async_trait]
impl VectorStore for PineconeVectorStore {
    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn ensure_collection(&self) -> AppResult<()> {
        let url = format!("{}/indexes", self.control_plane_url);
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        let indexes: IndexList = ensure_success(response, "list indexes").await?.json().await?;

        if indexes.indexes.iter().any(|index| index.name == self.index_name) {
            log::info!("Pinecone index '{}' already exists", self.index_name);
            return Ok(());
        }

        log::info!(
            "Creating Pinecone index '{}' ({} dimensions, {} metric)",
            self.index_name,
            self.dimension,
            METRIC
        );

        let body = json!({
            "name": self.index_name,
            "dimension": self.dimension,
            "metric": METRIC,
            "spec": {
                "serverless": { "cloud": self.cloud, "region": self.region }
            }
        });
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await?;
        let created: IndexDescription = ensure_success(response, "create index").await?.json().await?;

        if let Some(host) = created.host {
            let _ = self.host.set(host);
        }

        log::info!("Successfully created Pinecone index '{}'", self.index_name);
        Ok(())
    }

    async fn upsert(&self, record: VectorRecord) -> AppResult<()> {
        check_dimension(self.dimension, &record.values)?;

        let url = self.data_plane_url("/vectors/upsert").await?;
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&json!({ "vectors": [record] }))
            .send()
            .await?;
        ensure_success(response, "upsert").await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> AppResult<Vec<QueryMatch>> {
        check_dimension(self.dimension, vector)?;

        let mut body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
            "includeValues": false,
        });
        if !filter.is_empty() {
            body["filter"] = filter.to_pinecone();
        }

        let url = self.data_plane_url("/query").await?;
        let response = self
            .request(reqwest::Method::POST, &url)
            .json(&body)
            .send()
            .await?;
        let result: QueryResponse = ensure_success(response, "query").await?.json().await?;
        Ok(result.matches)
    }

    async fn fetch(&self, id: &str) -> AppResult<Option<VectorRecord>> {
        let url = self.data_plane_url("/vectors/fetch").await?;
        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&[("ids", id)])
            .send()
            .await?;
        let mut result: FetchResponse = ensure_success(response, "fetch").await?.json().await?;
        Ok(result.vectors.remove(id))
    }

    async fn health_check(&self) -> AppResult<()> {
        self.describe_index().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn store() -> PineconeVectorStore {
        let config = Config::test_config();
        let pinecone = config.pinecone.expect("test config has pinecone settings");
        PineconeVectorStore::new(&pinecone, config.embedding_dimension).expect("client builds")
    }

    #[test]
    fn data_plane_url_adds_scheme_when_missing() {
        assert_eq!(
            data_plane_url("quiz-abc.svc.pinecone.io", "/query"),
            "https://quiz-abc.svc.pinecone.io/query"
        );
        assert_eq!(
            data_plane_url("http://localhost:5081/", "/vectors/upsert"),
            "http://localhost:5081/vectors/upsert"
        );
    }

    #[test]
    fn query_response_tolerates_missing_fields() {
        let body = r#"{"matches":[{"id":"quiz_u1_x","score":0.0,"metadata":{"topic":"Math"}},{"id":"bare"}],"namespace":""}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.matches.len(), 2);
        assert_eq!(parsed.matches[0].metadata["topic"], "Math");
        assert!(parsed.matches[1].metadata.is_empty());
    }

    #[test]
    fn fetch_response_is_keyed_by_id() {
        let body = r#"{"vectors":{"user_u1":{"id":"user_u1","values":[0.1,0.2],"metadata":{"grade":"7"}}}}"#;
        let mut parsed: FetchResponse = serde_json::from_str(body).unwrap();

        let record = parsed.vectors.remove("user_u1").expect("record present");
        assert_eq!(record.values, vec![0.1, 0.2]);
    }

    #[test]
    fn test_store_reports_configured_index() {
        let store = store();
        assert_eq!(store.index_name(), "edututor-test");
        assert_eq!(store.dimension(), 1024);
    }

    #[actix_web::test]
    async fn upsert_validates_dimension_before_any_request() {
        let store = store();
        let result = store
            .upsert(VectorRecord {
                id: "x".to_string(),
                values: vec![0.0; 3],
                metadata: Default::default(),
            })
            .await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
