use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

pub const MAX_QUESTIONS_PER_QUIZ: usize = 10;
pub const DEFAULT_QUESTIONS_PER_QUIZ: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GenerateQuizQuery {
    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[validate(range(min = 1, max = 10))]
    pub num_questions: Option<usize>,
}

impl GenerateQuizQuery {
    pub fn question_count(&self) -> usize {
        self.num_questions.unwrap_or(DEFAULT_QUESTIONS_PER_QUIZ)
    }
}

/// Body of `POST /submit-quiz`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_submission"))]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1, max = 256))]
    pub user_id: String,

    #[validate(length(min = 1, max = 200))]
    pub topic: String,

    #[validate(range(min = 0))]
    pub score: i64,

    #[validate(length(equal = 1024, message = "embedding must have 1024 dimensions"))]
    pub embedding: Vec<f32>,

    pub questions: Vec<String>,

    pub answers: Vec<String>,
}

fn validate_submission(request: &SubmitQuizRequest) -> Result<(), ValidationError> {
    if request.questions.len() != request.answers.len() {
        return Err(ValidationError::new("questions_answers_mismatch").with_message(Cow::Owned(
            format!(
                "{} questions were submitted with {} answers",
                request.questions.len(),
                request.answers.len()
            ),
        )));
    }

    if request.score > request.questions.len() as i64 {
        return Err(ValidationError::new("score_out_of_range").with_message(Cow::Owned(format!(
            "score {} exceeds the number of questions ({})",
            request.score,
            request.questions.len()
        ))));
    }

    Ok(())
}

/// Body of `PUT /user/{user_id}/profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct UpsertProfileRequest {
    #[validate(length(min = 1))]
    pub embedding: Vec<f32>,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}
