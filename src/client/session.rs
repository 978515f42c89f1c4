use crate::{
    client::{ClientError, ClientResult, QuizApi},
    config::DEFAULT_EMBEDDING_DIMENSION,
    models::{domain::QuizQuestion, dto::request::SubmitQuizRequest},
    services::quiz_attempt_service::{QuestionReview, QuizAttemptService},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizState {
    NoQuiz,
    QuizLoaded,
    Submitted,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmissionOutcome {
    pub score: usize,
    pub total: usize,
    pub review: Vec<QuestionReview>,
    /// Set when the attempt could not be stored. The score still stands.
    pub warning: Option<String>,
}

/// Non-semantic filler vector sent with every submission: `0.01 * i` rounded
/// to four decimals.
pub fn placeholder_embedding() -> Vec<f32> {
    (0..DEFAULT_EMBEDDING_DIMENSION)
        .map(|i| ((0.01 * i as f64 * 10_000.0).round() / 10_000.0) as f32)
        .collect()
}

/// One student's quiz-taking flow: generate, answer, submit, try another.
#[derive(Debug)]
pub struct QuizSession {
    user_id: String,
    topic: String,
    questions: Vec<QuizQuestion>,
    selections: Vec<Option<String>>,
    submitted: bool,
}

impl QuizSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            topic: String::new(),
            questions: Vec::new(),
            selections: Vec::new(),
            submitted: false,
        }
    }

    pub fn state(&self) -> QuizState {
        if self.questions.is_empty() {
            QuizState::NoQuiz
        } else if self.submitted {
            QuizState::Submitted
        } else {
            QuizState::QuizLoaded
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    /// Replaces the current quiz with a freshly generated one. On failure the
    /// session keeps whatever it held before.
    pub async fn generate(
        &mut self,
        api: &dyn QuizApi,
        topic: &str,
        num_questions: usize,
    ) -> ClientResult<()> {
        let questions = api.generate_quiz(topic, num_questions).await?;
        if questions.is_empty() {
            return Err(ClientError::Session(
                "The backend returned an empty quiz".to_string(),
            ));
        }

        self.topic = topic.to_string();
        self.selections = vec![None; questions.len()];
        self.questions = questions;
        self.submitted = false;
        Ok(())
    }

    pub fn select(&mut self, index: usize, option: &str) -> ClientResult<()> {
        if self.state() != QuizState::QuizLoaded {
            return Err(ClientError::Session(
                "Answers can only be chosen while a quiz is open".to_string(),
            ));
        }

        let question = self.questions.get(index).ok_or_else(|| {
            ClientError::Session(format!("There is no question {}", index + 1))
        })?;
        if !question.options.iter().any(|o| o == option) {
            return Err(ClientError::Session(format!(
                "'{}' is not an option for question {}",
                option,
                index + 1
            )));
        }

        self.selections[index] = Some(option.to_string());
        Ok(())
    }

    /// Scores the quiz locally and posts the attempt. The session moves to
    /// `Submitted` even when the post fails; the failure comes back as a
    /// warning on the outcome.
    pub async fn submit(&mut self, api: &dyn QuizApi) -> ClientResult<SubmissionOutcome> {
        if self.state() != QuizState::QuizLoaded {
            return Err(ClientError::Session("There is no open quiz to submit".to_string()));
        }

        let answers: Vec<String> = self
            .selections
            .iter()
            .enumerate()
            .map(|(index, selection)| {
                selection.clone().ok_or_else(|| {
                    ClientError::Session(format!("Question {} has no answer", index + 1))
                })
            })
            .collect::<ClientResult<_>>()?;

        let score = QuizAttemptService::grade_answers(&self.questions, &answers);
        let review = QuizAttemptService::review(&self.questions, &answers);

        let submission = SubmitQuizRequest {
            user_id: self.user_id.clone(),
            topic: self.topic.clone(),
            score: score as i64,
            embedding: placeholder_embedding(),
            questions: self.questions.iter().map(|q| q.question.clone()).collect(),
            answers,
        };

        let warning = match api.submit_quiz(&submission).await {
            Ok(()) => None,
            Err(err) => {
                log::warn!("Quiz submission for '{}' failed: {}", self.user_id, err);
                Some(format!("Quiz submission failed: {}", err))
            }
        };

        self.submitted = true;
        Ok(SubmissionOutcome {
            score,
            total: self.questions.len(),
            review,
            warning,
        })
    }

    /// Discards the current quiz so a new one can be generated.
    pub fn reset(&mut self) {
        self.topic.clear();
        self.questions.clear();
        self.selections.clear();
        self.submitted = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{client::api_client::MockQuizApi, test_utils::fixtures};
    use mockall::predicate::eq;

    fn loaded_session(api: &MockQuizApi) -> QuizSession {
        let mut session = QuizSession::new("u1");
        futures::executor::block_on(session.generate(api, "Science", 3)).unwrap();
        session
    }

    fn api_returning_questions() -> MockQuizApi {
        let mut api = MockQuizApi::new();
        api.expect_generate_quiz()
            .with(eq("Science"), eq(3))
            .returning(|_, _| Ok(fixtures::sample_questions()));
        api
    }

    #[test]
    fn test_placeholder_embedding() {
        let embedding = placeholder_embedding();
        assert_eq!(embedding.len(), 1024);
        assert_eq!(embedding[0], 0.0);
        assert_eq!(embedding[1], 0.01);
        assert_eq!(embedding[1023], 10.23);
    }

    #[tokio::test]
    async fn test_generate_loads_quiz() {
        let api = api_returning_questions();
        let mut session = QuizSession::new("u1");
        assert_eq!(session.state(), QuizState::NoQuiz);

        session.generate(&api, "Science", 3).await.unwrap();
        assert_eq!(session.state(), QuizState::QuizLoaded);
        assert_eq!(session.topic(), "Science");
        assert_eq!(session.questions().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_generate_stays_in_no_quiz() {
        let mut api = MockQuizApi::new();
        api.expect_generate_quiz().returning(|_, _| {
            Err(ClientError::Api {
                status: 502,
                body: "Quiz generation failed".to_string(),
            })
        });

        let mut session = QuizSession::new("u1");
        assert!(session.generate(&api, "Science", 3).await.is_err());
        assert_eq!(session.state(), QuizState::NoQuiz);
    }

    #[tokio::test]
    async fn test_submit_requires_every_answer() {
        let mut api = api_returning_questions();
        api.expect_submit_quiz().never();
        let mut session = loaded_session(&api);

        session.select(0, "B. 4").unwrap();
        let result = session.submit(&api).await;

        assert!(matches!(result, Err(ClientError::Session(_))));
        assert_eq!(session.state(), QuizState::QuizLoaded);
    }

    #[tokio::test]
    async fn test_submit_scores_and_posts_attempt() {
        let mut api = api_returning_questions();
        api.expect_submit_quiz()
            .withf(|submission| {
                submission.user_id == "u1"
                    && submission.topic == "Science"
                    && submission.score == 2
                    && submission.embedding.len() == 1024
                    && submission.answers == ["B. 4", "A. Venus", "C. Oxygen"]
            })
            .times(1)
            .returning(|_| Ok(()));
        let mut session = loaded_session(&api);

        session.select(0, "B. 4").unwrap();
        session.select(1, "A. Venus").unwrap();
        session.select(2, "C. Oxygen").unwrap();
        let outcome = session.submit(&api).await.unwrap();

        assert_eq!(outcome.score, 2);
        assert_eq!(outcome.total, 3);
        assert!(outcome.warning.is_none());
        assert!(!outcome.review[1].is_correct);
        assert_eq!(session.state(), QuizState::Submitted);
    }

    #[tokio::test]
    async fn test_failed_post_still_submits() {
        let mut api = api_returning_questions();
        api.expect_submit_quiz().returning(|_| {
            Err(ClientError::Api {
                status: 500,
                body: "Vector store request failed".to_string(),
            })
        });
        let mut session = loaded_session(&api);

        for (index, option) in ["B. 4", "B. Mars", "C. Oxygen"].iter().enumerate() {
            session.select(index, option).unwrap();
        }
        let outcome = session.submit(&api).await.unwrap();

        assert_eq!(outcome.score, 3);
        assert!(outcome.warning.is_some());
        assert_eq!(session.state(), QuizState::Submitted);
    }

    #[tokio::test]
    async fn test_reset_returns_to_no_quiz() {
        let mut api = api_returning_questions();
        api.expect_submit_quiz().returning(|_| Ok(()));
        let mut session = loaded_session(&api);
        for index in 0..3 {
            let option = session.questions()[index].options[0].clone();
            session.select(index, &option).unwrap();
        }
        session.submit(&api).await.unwrap();

        assert!(session.select(0, "A. 3").is_err());
        session.reset();
        assert_eq!(session.state(), QuizState::NoQuiz);
        assert!(session.questions().is_empty());
    }

    #[test]
    fn test_select_rejects_unknown_option() {
        let api = api_returning_questions();
        let mut session = loaded_session(&api);

        assert!(session.select(0, "D. 22").is_err());
        assert!(session.select(7, "A. 3").is_err());
    }
}
