pub mod quiz_attempt_repository;
pub mod user_profile_repository;

pub use quiz_attempt_repository::{QuizAttemptRepository, VectorQuizAttemptRepository};
pub use user_profile_repository::{UserProfileRepository, VectorUserProfileRepository};
