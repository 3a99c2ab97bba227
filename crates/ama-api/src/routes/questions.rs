//! Question board routes

use ama_auth::{Principal, auth_middleware};
use ama_db::{NewQuestion, Question};
use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware,
    routing::{get, patch},
};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{AnswerRequest, JsonResponse, NewQuestionRequest};

/// GET /questions
async fn list_questions(State(state): State<AppState>) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = state.db.list_questions().await?;
    Ok(Json(questions))
}

/// POST /questions
async fn create_question(
    State(state): State<AppState>,
    payload: Result<Json<NewQuestionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JsonResponse>), ApiError> {
    let Json(request) = payload?;

    if request.author_email.trim().is_empty() {
        return Err(ApiError::BadRequest("Author email cannot be empty".to_string()));
    }
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question cannot be empty".to_string()));
    }

    let question = state
        .db
        .insert_question(NewQuestion {
            author_email: request.author_email,
            question: request.question,
        })
        .await?;

    info!("Question {} created", question.id);

    Ok((
        StatusCode::ACCEPTED,
        Json(JsonResponse::ok("Question created successfully")),
    ))
}

/// PATCH /admin/questions/{id}
async fn update_question(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    payload: Result<Json<AnswerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<JsonResponse>), ApiError> {
    let Json(request) = payload?;

    state
        .db
        .get_question(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Question {} not found", id)))?;

    if !state.db.update_question_answer(id, &request.answer).await? {
        return Err(ApiError::NotFound(format!("Question {} not found", id)));
    }

    info!("Question {} answered by user {}", id, principal.id);

    Ok((
        StatusCode::ACCEPTED,
        Json(JsonResponse::ok("Question updated successfully")),
    ))
}

/// DELETE /admin/questions/{id}
async fn delete_question(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<JsonResponse>), ApiError> {
    if !state.db.delete_question(id).await? {
        return Err(ApiError::NotFound(format!("Question {} not found", id)));
    }

    info!("Question {} deleted by user {}", id, principal.id);

    Ok((
        StatusCode::ACCEPTED,
        Json(JsonResponse::ok("Question deleted successfully")),
    ))
}

/// Create question routes. Everything under `/admin` requires a bearer
/// access token.
pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = Router::new()
        .route(
            "/admin/questions/{id}",
            patch(update_question).delete(delete_question),
        )
        .route_layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .merge(admin)
}
