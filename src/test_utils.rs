use crate::models::{domain::QuizQuestion, dto::request::SubmitQuizRequest};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    fn question(text: &str, options: &[&str], correct_answer: &str) -> QuizQuestion {
        QuizQuestion {
            question: text.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_answer: correct_answer.to_string(),
        }
    }

    /// Three questions whose correct labels are B, B and C.
    pub fn sample_questions() -> Vec<QuizQuestion> {
        vec![
            question("What is 2 + 2?", &["A. 3", "B. 4", "C. 5"], "B"),
            question(
                "Which planet is known as the red planet?",
                &["A. Venus", "B. Mars", "C. Jupiter"],
                "B",
            ),
            question(
                "Which gas do plants release during photosynthesis?",
                &["A. Nitrogen", "B. Carbon dioxide", "C. Oxygen"],
                "C",
            ),
        ]
    }

    /// A valid submission for the sample questions with two correct answers.
    pub fn sample_submission(user_id: &str) -> SubmitQuizRequest {
        let questions = sample_questions();
        SubmitQuizRequest {
            user_id: user_id.to_string(),
            topic: "General Knowledge".to_string(),
            score: 2,
            embedding: vec![0.0; 1024],
            questions: questions.iter().map(|q| q.question.clone()).collect(),
            answers: vec![
                "B. 4".to_string(),
                "B. Mars".to_string(),
                "A. Nitrogen".to_string(),
            ],
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use validator::Validate;

    #[test]
    fn test_sample_submission_is_valid() {
        let submission = sample_submission("u1");
        assert!(submission.validate().is_ok());
        assert_eq!(submission.questions.len(), submission.answers.len());
    }

    #[test]
    fn test_sample_questions_have_labelled_options() {
        for question in sample_questions() {
            assert!(question.options.iter().all(|o| o.contains(". ")));
        }
    }
}
