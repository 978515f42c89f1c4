use async_openai::{config::OpenAIConfig, Client};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;

use crate::{
    config::Config,
    constants::quiz_prompt::{quiz_request_prompt, QUIZ_GENERATION_PROMPT},
    errors::{AppError, AppResult},
    models::domain::QuizQuestion,
};

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("CODE_FENCE is a valid regex")
});

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate_quiz(&self, topic: &str, num_questions: usize)
        -> AppResult<Vec<QuizQuestion>>;
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GeneratedQuiz {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Quiz generator backed by any OpenAI-compatible chat completion endpoint.
pub struct OpenAiQuizGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuizGenerator {
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.expose_secret())
            .with_api_base(&config.openai_api_base);

        Self {
            client: Client::with_config(openai_config),
            model: config.quiz_model.clone(),
        }
    }
}

#[async_trait]
impl QuizGenerator for OpenAiQuizGenerator {
    async fn generate_quiz(
        &self,
        topic: &str,
        num_questions: usize,
    ) -> AppResult<Vec<QuizQuestion>> {
        let schema = schemars::schema_for!(GeneratedQuiz);
        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": QUIZ_GENERATION_PROMPT },
                { "role": "user", "content": quiz_request_prompt(topic, num_questions) }
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "generated_quiz",
                    "schema": schema
                }
            }
        });

        let completion: ChatCompletion = self.client.chat().create_byot(request).await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::ModelError("Model returned no content".to_string()))?;

        let questions = parse_generated_quiz(&content)?;
        if questions.len() != num_questions {
            log::warn!(
                "Requested {} questions on '{}' but the model returned {}",
                num_questions,
                topic,
                questions.len()
            );
        }
        Ok(questions)
    }
}

/// Parses model output into questions. Accepts either `{"questions": [...]}`
/// or a bare array, optionally wrapped in a Markdown code fence. Questions
/// without options are dropped.
pub fn parse_generated_quiz(content: &str) -> AppResult<Vec<QuizQuestion>> {
    let body = CODE_FENCE
        .captures(content)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(content)
        .trim();

    let questions = match serde_json::from_str::<GeneratedQuiz>(body) {
        Ok(quiz) => quiz.questions,
        Err(_) => serde_json::from_str::<Vec<QuizQuestion>>(body).map_err(|e| {
            AppError::ModelError(format!("Model output is not a valid quiz: {}", e))
        })?,
    };

    let questions: Vec<QuizQuestion> = questions
        .into_iter()
        .filter(|q| !q.options.is_empty() && !q.question.trim().is_empty())
        .collect();

    if questions.is_empty() {
        return Err(AppError::ModelError("Model returned no usable questions".to_string()));
    }
    Ok(questions)
}
