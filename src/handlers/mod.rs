pub mod quiz_handler;
pub mod user_handler;

use actix_web::web;

use crate::errors::AppError;

pub use quiz_handler::{get_quiz, root, submit_quiz};
pub use user_handler::{
    get_quiz_history, get_user_profile, health_check, health_check_live, health_check_ready,
    put_user_profile,
};

/// Registers every route along with extractor configs that report malformed
/// input through the same error body as the handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(err.to_string()).into()
    }))
    .service(root)
    .service(get_quiz)
    .service(submit_quiz)
    .service(get_quiz_history)
    .service(put_user_profile)
    .service(get_user_profile)
    .service(health_check)
    .service(health_check_live)
    .service(health_check_ready);
}
