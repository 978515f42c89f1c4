use async_trait::async_trait;
use reqwest::Url;

use crate::{
    client::{ensure_success, ClientError, ClientResult, DEFAULT_API_URL},
    models::{
        domain::{HistoryEntry, QuizQuestion},
        dto::{
            request::SubmitQuizRequest,
            response::{GenerateQuizResponse, QuizHistoryResponse},
        },
    },
};

/// Backend operations the quiz session depends on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn generate_quiz(&self, topic: &str, num_questions: usize)
        -> ClientResult<Vec<QuizQuestion>>;

    async fn submit_quiz(&self, submission: &SubmitQuizRequest) -> ClientResult<()>;

    async fn quiz_history(&self, user_id: &str) -> ClientResult<Vec<HistoryEntry>>;
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "API URL '{}' cannot be used as a base",
                base_url
            )));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    /// Reads `EDUTUTOR_API_URL`, falling back to the local backend.
    pub fn from_env() -> ClientResult<Self> {
        let base_url =
            std::env::var("EDUTUTOR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(&base_url)
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl QuizApi for ApiClient {
    async fn generate_quiz(
        &self,
        topic: &str,
        num_questions: usize,
    ) -> ClientResult<Vec<QuizQuestion>> {
        let response = self
            .http
            .get(self.endpoint(&["quiz"]))
            .query(&[("topic", topic), ("num_questions", &num_questions.to_string())])
            .send()
            .await?;

        let body: GenerateQuizResponse = ensure_success(response).await?.json().await?;
        Ok(body.quiz)
    }

    async fn submit_quiz(&self, submission: &SubmitQuizRequest) -> ClientResult<()> {
        let response = self
            .http
            .post(self.endpoint(&["submit-quiz"]))
            .json(submission)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn quiz_history(&self, user_id: &str) -> ClientResult<Vec<HistoryEntry>> {
        let response = self
            .http
            .get(self.endpoint(&["user", user_id, "quiz-history"]))
            .send()
            .await?;

        let body: QuizHistoryResponse = ensure_success(response).await?.json().await?;
        Ok(body.quiz_history)
    }
}
