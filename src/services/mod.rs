pub mod model_service;
pub mod quiz_attempt_service;
pub mod quiz_service;
pub mod user_service;
