use serde::{Deserialize, Serialize};

use crate::models::domain::{HistoryEntry, QuizQuestion};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn success(message: impl Into<String>) -> Self {
        StatusResponse {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub topic: String,
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizHistoryResponse {
    pub user_id: String,
    pub quiz_history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_success() {
        let response = StatusResponse::success("Quiz stored successfully");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Quiz stored successfully");
    }

    #[test]
    fn test_history_response_shape() {
        let body = r#"{
            "user_id": "u1",
            "quiz_history": [
                {"timestamp": "Unknown", "score": "N/A", "topic": "N/A", "questions": [], "answers": []}
            ]
        }"#;

        let parsed: QuizHistoryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.quiz_history.len(), 1);
        assert_eq!(parsed.quiz_history[0].score.to_string(), "N/A");
    }
}
