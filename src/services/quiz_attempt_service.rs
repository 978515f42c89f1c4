use std::{cmp::Reverse, sync::Arc};

use chrono::DateTime;
use validator::Validate;

use crate::{
    db::check_dimension,
    errors::AppResult,
    models::{
        domain::{quiz_attempt::QuizAttempt, HistoryEntry, QuizQuestion},
        dto::request::SubmitQuizRequest,
    },
    repositories::QuizAttemptRepository,
};

/// Per-question outcome shown back to the student after submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionReview {
    pub number: usize,
    pub question: String,
    pub chosen: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

pub struct QuizAttemptService {
    repository: Arc<dyn QuizAttemptRepository>,
    embedding_dimension: usize,
}

impl QuizAttemptService {
    pub fn new(repository: Arc<dyn QuizAttemptRepository>, embedding_dimension: usize) -> Self {
        Self {
            repository,
            embedding_dimension,
        }
    }

    /// Validates a submission and persists it as a new attempt.
    pub async fn store_attempt(&self, request: SubmitQuizRequest) -> AppResult<QuizAttempt> {
        request.validate()?;
        check_dimension(self.embedding_dimension, &request.embedding)?;

        let attempt = QuizAttempt::new(
            &request.user_id,
            &request.topic,
            request.score,
            request.embedding,
            request.questions,
            request.answers,
        );

        log::info!(
            "Storing quiz attempt {} for user '{}' on '{}'",
            attempt.id,
            attempt.user_id,
            attempt.topic
        );
        self.repository.create(attempt).await
    }

    /// Newest-first attempt history. Store failures yield an empty history.
    pub async fn get_history(&self, user_id: &str, top_k: usize) -> Vec<HistoryEntry> {
        match self.repository.find_by_user(user_id, top_k).await {
            Ok(mut history) => {
                sort_newest_first(&mut history);
                history
            }
            Err(err) => {
                log::error!("Error fetching quiz history for '{}': {}", user_id, err);
                Vec::new()
            }
        }
    }

    /// Counts positions where the chosen option's label matches the question's
    /// correct answer. Unanswered trailing questions count as wrong.
    pub fn grade_answers(questions: &[QuizQuestion], chosen_options: &[String]) -> usize {
        questions
            .iter()
            .zip(chosen_options)
            .filter(|(question, chosen)| question.is_correct(chosen))
            .count()
    }

    pub fn review(questions: &[QuizQuestion], chosen_options: &[String]) -> Vec<QuestionReview> {
        questions
            .iter()
            .zip(chosen_options)
            .enumerate()
            .map(|(index, (question, chosen))| QuestionReview {
                number: index + 1,
                question: question.question.clone(),
                chosen: chosen.clone(),
                correct_answer: question.correct_answer.clone(),
                is_correct: question.is_correct(chosen),
            })
            .collect()
    }
}

/// Orders entries by timestamp, newest first. Entries whose timestamp does
/// not parse (including the "Unknown" placeholder) go last.
fn sort_newest_first(history: &mut [HistoryEntry]) {
    history.sort_by_cached_key(|entry| {
        Reverse(DateTime::parse_from_rfc3339(&entry.timestamp).ok())
    });
}
