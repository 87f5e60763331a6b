use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::domain::models::status::InterviewStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Internal server error")]
    Internal,

    // Domain failures. Each carries enough context for the caller to retry
    // or correct; none of these map to a 5xx.
    #[error("Transition from {from} to {to} is not allowed")]
    InvalidTransition {
        from: InterviewStatus,
        to: InterviewStatus,
    },
    #[error("Not authorized to perform this action")]
    NotAuthorized,
    #[error("Actor does not match the expected party for this confirmation")]
    WrongRole,
    #[error("No interviewer with id {0}")]
    NoSuchInterviewer(String),
    #[error("Interviewer {interviewer_id} is not available on {date} at {time}")]
    SlotUnavailable {
        interviewer_id: String,
        date: NaiveDate,
        time: NaiveTime,
    },
    #[error("Interview {0} has no active assignment")]
    NotAssigned(String),
    #[error("Interview {id} is in terminal status {status}")]
    AlreadyTerminal {
        id: String,
        status: InterviewStatus,
    },
    #[error("Interview was modified concurrently, re-fetch and retry")]
    ConcurrencyConflict,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Database(e) => {
                if let Some(db_err) = e.as_database_error() {
                    let code = db_err.code().unwrap_or_default();

                    // 2067 = SQLite Unique Constraint
                    // 23505 = PostgreSQL Unique Violation
                    if code == "2067" || code == "23505" {
                        return (
                            StatusCode::CONFLICT,
                            Json(json!({ "error": "Resource already exists (duplicate entry)" }))
                        ).into_response();
                    }
                }

                error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal server error" }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" })),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal error" })),

            AppError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                json!({
                    "error": self.to_string(),
                    "code": "INVALID_TRANSITION",
                    "from": from,
                    "to": to,
                }),
            ),
            AppError::NotAuthorized => (
                StatusCode::FORBIDDEN,
                json!({ "error": self.to_string(), "code": "NOT_AUTHORIZED" }),
            ),
            AppError::WrongRole => (
                StatusCode::FORBIDDEN,
                json!({ "error": self.to_string(), "code": "WRONG_ROLE" }),
            ),
            AppError::NoSuchInterviewer(id) => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string(), "code": "NO_SUCH_INTERVIEWER", "interviewer_id": id }),
            ),
            AppError::SlotUnavailable { interviewer_id, .. } => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "code": "SLOT_UNAVAILABLE", "interviewer_id": interviewer_id }),
            ),
            AppError::NotAssigned(id) => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "code": "NOT_ASSIGNED", "interview_id": id }),
            ),
            AppError::AlreadyTerminal { id, status } => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "code": "ALREADY_TERMINAL", "interview_id": id, "status": status }),
            ),
            AppError::ConcurrencyConflict => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "code": "CONCURRENCY_CONFLICT" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
