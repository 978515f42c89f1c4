use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

pub const UNKNOWN_TIMESTAMP: &str = "Unknown";
pub const NOT_AVAILABLE: &str = "N/A";

/// One completed quiz session. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub user_id: String,
    pub topic: String,
    pub score: i64,
    pub timestamp: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
    pub embedding: Vec<f32>,
}

impl QuizAttempt {
    pub fn new(
        user_id: &str,
        topic: &str,
        score: i64,
        embedding: Vec<f32>,
        questions: Vec<String>,
        answers: Vec<String>,
    ) -> Self {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);
        QuizAttempt {
            id: attempt_id(user_id, &timestamp),
            user_id: user_id.to_string(),
            topic: topic.to_string(),
            score,
            timestamp,
            questions,
            answers,
            embedding,
        }
    }

    /// Metadata stored alongside the embedding. The embedding itself is the
    /// record's vector and is not duplicated here.
    pub fn metadata(&self) -> Map<String, Value> {
        let value = json!({
            "user_id": self.user_id,
            "topic": self.topic,
            "score": self.score,
            "timestamp": self.timestamp,
            "questions": self.questions,
            "answers": self.answers,
        });

        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

/// Storage id for an attempt. The random suffix keeps two submissions from the
/// same user within one timestamp tick from overwriting each other.
pub fn attempt_id(user_id: &str, timestamp: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("quiz_{}_{}_{}", user_id, timestamp, &suffix[..8])
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum HistoryScore {
    Points(i64),
    Unavailable(String),
}

impl Default for HistoryScore {
    fn default() -> Self {
        HistoryScore::Unavailable(NOT_AVAILABLE.to_string())
    }
}

impl std::fmt::Display for HistoryScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryScore::Points(points) => write!(f, "{}", points),
            HistoryScore::Unavailable(text) => write!(f, "{}", text),
        }
    }
}

/// Display form of a stored attempt, rebuilt from vector metadata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub score: HistoryScore,
    pub topic: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

impl HistoryEntry {
    pub fn from_metadata(metadata: &Map<String, Value>) -> Self {
        let text = |key: &str, fallback: &str| {
            metadata
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or(fallback)
                .to_string()
        };
        let list = |key: &str| -> Vec<String> {
            metadata
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(|item| item.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default()
        };

        // Pinecone hands numeric metadata back as floats.
        let score = metadata
            .get("score")
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64)))
            .map(HistoryScore::Points)
            .unwrap_or_default();

        HistoryEntry {
            timestamp: text("timestamp", UNKNOWN_TIMESTAMP),
            score,
            topic: text("topic", NOT_AVAILABLE),
            questions: list("questions"),
            answers: list("answers"),
        }
    }
}
