use axum::{extract::{State, Query}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateUserRequest, UserListQuery};
use crate::domain::models::status::Role;
use crate::domain::models::user::User;
use crate::error::AppError;
use std::sync::Arc;
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if actor.role != Role::Admin {
        return Err(AppError::NotAuthorized);
    }

    let role = Role::parse(&payload.role)
        .ok_or_else(|| AppError::Validation(format!("Unknown role: {}", payload.role)))?;

    if state.user_repo.find_by_email(&payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal)?
        .to_string();

    let user = User::new(payload.name, payload.email, password_hash, role);
    let created = state.user_repo.create(&user).await?;

    info!("Created {} account: {}", created.role, created.id);

    Ok((StatusCode::CREATED, Json(serde_json::json!({
        "id": created.id,
        "name": created.name,
        "email": created.email,
        "role": created.role,
        "created_at": created.created_at,
    }))))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, AppError> {
    if actor.role != Role::Admin {
        return Err(AppError::NotAuthorized);
    }

    let role = match query.role.as_deref() {
        Some(raw) => Some(
            Role::parse(raw).ok_or_else(|| AppError::Validation(format!("Unknown role: {raw}")))?,
        ),
        None => None,
    };

    let users = state.user_repo.list(role).await?;
    let safe_users: Vec<_> = users.into_iter().map(|u| serde_json::json!({
        "id": u.id,
        "name": u.name,
        "email": u.email,
        "role": u.role,
        "created_at": u.created_at,
    })).collect();

    Ok(Json(safe_users))
}
