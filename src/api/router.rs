use axum::{
    body::Body,
    extract::Request,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{assignment, auth, health, interview, notification, user};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/refresh", post(auth::refresh))
        .route("/api/v1/auth/logout", post(auth::logout))

        // Account management (admin)
        .route("/api/v1/users", post(user::create_user).get(user::list_users))

        // Interview requests
        .route("/api/v1/interviews", post(interview::create_interview).get(interview::list_interviews))
        .route("/api/v1/interviews/{id}", get(interview::get_interview).put(interview::update_interview).delete(interview::delete_interview))
        .route("/api/v1/interviews/{id}/actions", get(interview::permitted_actions))
        .route("/api/v1/interviews/{id}/status", patch(interview::update_status))

        // Assignment & confirmation workflow
        .route("/api/v1/interviews/{id}/assign", post(assignment::assign_interviewer))
        .route("/api/v1/interviews/{id}/decline", post(assignment::decline_assignment))
        .route("/api/v1/interviews/{id}/confirm", post(assignment::confirm))

        // Notification feed
        .route("/api/v1/notifications", get(notification::list_notifications))
        .route("/api/v1/notifications/unread-count", get(notification::unread_count))
        .route("/api/v1/notifications/{id}/read", patch(notification::mark_read))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
