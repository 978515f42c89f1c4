use actix_web::{get, post, web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{GenerateQuizQuery, SubmitQuizRequest},
        response::{GenerateQuizResponse, MessageResponse, StatusResponse},
    },
};

#[get("/")]
async fn root() -> HttpResponse {
    HttpResponse::Ok().json(MessageResponse {
        message: "EduTutor AI Backend is running.".to_string(),
    })
}

#[get("/quiz")]
async fn get_quiz(
    state: web::Data<AppState>,
    query: web::Query<GenerateQuizQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    query.validate()?;

    let topic = query.topic.trim();
    let quiz = state
        .quiz_service
        .generate_quiz(topic, query.question_count())
        .await?;

    Ok(HttpResponse::Ok().json(GenerateQuizResponse {
        topic: topic.to_string(),
        quiz,
    }))
}

#[post("/submit-quiz")]
async fn submit_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let attempt = state
        .quiz_attempt_service
        .store_attempt(request.into_inner())
        .await?;

    log::info!(
        "[{}] stored attempt {}",
        get_request_id(&req).unwrap_or_default(),
        attempt.id
    );
    Ok(HttpResponse::Ok().json(StatusResponse::success("Quiz stored successfully")))
}
