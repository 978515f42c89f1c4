use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::{domain::QuizQuestion, dto::request::MAX_QUESTIONS_PER_QUIZ},
    services::model_service::QuizGenerator,
};

pub struct QuizService {
    generator: Arc<dyn QuizGenerator>,
}

impl QuizService {
    pub fn new(generator: Arc<dyn QuizGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate_quiz(
        &self,
        topic: &str,
        num_questions: usize,
    ) -> AppResult<Vec<QuizQuestion>> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(AppError::ValidationError("topic must not be empty".to_string()));
        }
        if !(1..=MAX_QUESTIONS_PER_QUIZ).contains(&num_questions) {
            return Err(AppError::ValidationError(format!(
                "num_questions must be between 1 and {}",
                MAX_QUESTIONS_PER_QUIZ
            )));
        }

        log::info!("Generating {} questions on '{}'", num_questions, topic);
        let quiz = self.generator.generate_quiz(topic, num_questions).await?;
        log::info!("Generated {} questions on '{}'", quiz.len(), topic);

        Ok(quiz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{services::model_service::MockQuizGenerator, test_utils::fixtures};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn delegates_trimmed_topic_to_generator() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate_quiz()
            .with(eq("Machine Learning"), eq(3))
            .times(1)
            .returning(|_, _| Ok(fixtures::sample_questions()));

        let service = QuizService::new(Arc::new(generator));
        let quiz = service.generate_quiz("  Machine Learning ", 3).await.unwrap();

        assert_eq!(quiz.len(), 3);
    }

    #[tokio::test]
    async fn rejects_blank_topic_without_calling_generator() {
        let mut generator = MockQuizGenerator::new();
        generator.expect_generate_quiz().never();

        let service = QuizService::new(Arc::new(generator));
        let result = service.generate_quiz("   ", 3).await;

        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn rejects_out_of_range_question_count() {
        let mut generator = MockQuizGenerator::new();
        generator.expect_generate_quiz().never();

        let service = QuizService::new(Arc::new(generator));
        assert!(service.generate_quiz("Math", 0).await.is_err());
        assert!(service.generate_quiz("Math", 11).await.is_err());
    }

    #[tokio::test]
    async fn propagates_generator_failure() {
        let mut generator = MockQuizGenerator::new();
        generator
            .expect_generate_quiz()
            .returning(|_, _| Err(AppError::ModelError("upstream timeout".to_string())));

        let service = QuizService::new(Arc::new(generator));
        let result = service.generate_quiz("Math", 5).await;

        assert!(matches!(result, Err(AppError::ModelError(_))));
    }
}
