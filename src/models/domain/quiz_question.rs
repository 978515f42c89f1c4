use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A multiple-choice question as produced by the quiz generator. Options carry
/// a leading label, e.g. `"B. Gradient descent"`, and `correct_answer` holds the
/// bare label (`"B"`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(alias = "answer")]
    pub correct_answer: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, selected_option: &str) -> bool {
        option_label(selected_option) == self.correct_answer
    }
}

/// Label of an option string: the text before the first `.`, trimmed.
pub fn option_label(option: &str) -> &str {
    option.split('.').next().unwrap_or(option).trim()
}
