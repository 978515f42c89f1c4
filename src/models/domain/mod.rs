pub mod quiz_attempt;
pub mod quiz_question;
pub mod user_profile;
pub use quiz_attempt::{HistoryEntry, HistoryScore, QuizAttempt};
pub use quiz_question::QuizQuestion;
pub use user_profile::UserProfile;
