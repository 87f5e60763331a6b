use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::NotificationListQuery;
use crate::error::AppError;
use chrono::Utc;
use std::sync::Arc;

pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let notifications = state.notification_repo.list_for_user(&actor.id, limit).await?;

    Ok(Json(notifications))
}

pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let count = state.notification_repo.unread_count(&actor.id).await?;

    Ok(Json(serde_json::json!({ "count": count })))
}

pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let notification = state.notification_repo.mark_read(&actor.id, &id, Utc::now()).await?
        .ok_or(AppError::NotFound("Notification not found".into()))?;

    Ok(Json(notification))
}
