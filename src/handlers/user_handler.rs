use actix_web::{get, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::UpsertProfileRequest,
        response::{QuizHistoryResponse, StatusResponse},
    },
};

#[get("/user/{user_id}/quiz-history")]
async fn get_quiz_history(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user_id = user_id.into_inner();
    let quiz_history = state
        .quiz_attempt_service
        .get_history(&user_id, state.config.history_top_k)
        .await;

    Ok(HttpResponse::Ok().json(QuizHistoryResponse {
        user_id,
        quiz_history,
    }))
}

#[put("/user/{user_id}/profile")]
async fn put_user_profile(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
    request: web::Json<UpsertProfileRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .user_profile_service
        .store_profile(&user_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(StatusResponse::success("Profile stored successfully")))
}

#[get("/user/{user_id}/profile")]
async fn get_user_profile(
    state: web::Data<AppState>,
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let profile = state.user_profile_service.get_profile(&user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
async fn health_check_ready(state: web::Data<AppState>) -> HttpResponse {
    let store_health = state.vector_store.health_check().await;
    if let Err(err) = &store_health {
        log::warn!("Vector store health check failed: {}", err);
    }

    let status = if store_health.is_ok() {
        "ready"
    } else {
        "not_ready"
    };

    let response = serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "vector_store": if store_health.is_ok() { "ok" } else { "error" }
        }
    });

    if store_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

#[get("/health/live")]
async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
