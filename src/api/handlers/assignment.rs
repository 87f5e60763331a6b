use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::AssignInterviewerRequest;
use crate::domain::models::status::Role;
use crate::error::AppError;
use std::sync::Arc;

pub async fn assign_interviewer(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<AssignInterviewerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state
        .assignment_engine
        .assign_interviewer(&id, &payload.interviewer_id, &actor)
        .await?;

    Ok(Json(updated))
}

pub async fn decline_assignment(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = state.assignment_engine.decline_assignment(&id, &actor).await?;

    Ok(Json(updated))
}

/// One confirm surface for both parties; the caller's role picks the side
/// of the mutual confirmation.
pub async fn confirm(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let updated = match actor.role {
        Role::Candidate => state.confirmation.confirm_as_candidate(&id, &actor).await?,
        Role::Interviewer => state.confirmation.confirm_as_interviewer(&id, &actor).await?,
        Role::Admin => return Err(AppError::WrongRole),
    };

    Ok(Json(updated))
}
