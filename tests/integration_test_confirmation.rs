mod common;

use axum::http::StatusCode;
use common::TestApp;
use interview_backend::domain::models::status::Role;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

struct Fixture {
    app: TestApp,
    candidate_auth: common::AuthHeaders,
    interviewer_auth: common::AuthHeaders,
    admin_auth: common::AuthHeaders,
    interview_id: String,
}

/// Seed a request already in INTERVIEWER_ASSIGNED.
async fn assigned_fixture() -> Fixture {
    let app = TestApp::new().await;

    app.seed_user("Admin", "admin@test.com", "admin-pass", Role::Admin).await;
    app.seed_user("Cara", "cara@test.com", "candidate-pass", Role::Candidate).await;
    let interviewer = app.seed_user("Ivan", "ivan@test.com", "interviewer-pass", Role::Interviewer).await;
    app.seed_full_availability(&interviewer.id).await;

    let candidate_auth = app.login("cara@test.com", "candidate-pass").await;
    let interviewer_auth = app.login("ivan@test.com", "interviewer-pass").await;
    let admin_auth = app.login("admin@test.com", "admin-pass").await;

    let date = app.future_date();
    let interview = app.create_interview(&candidate_auth, &date, "10:00").await;
    let interview_id = interview["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(app.authed_request(
        &admin_auth,
        "POST",
        &format!("/api/v1/interviews/{interview_id}/assign"),
        Some(json!({ "interviewer_id": interviewer.id })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    Fixture { app, candidate_auth, interviewer_auth, admin_auth, interview_id }
}

#[tokio::test]
async fn test_candidate_then_interviewer_confirms() {
    let f = assigned_fixture().await;
    let id = &f.interview_id;

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.candidate_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "CANDIDATE_CONFIRMED");
    assert!(body["candidate_confirmed_at"].is_string());
    assert!(body["interviewer_confirmed_at"].is_null());

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.interviewer_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "CONFIRMED");
    assert!(body["candidate_confirmed_at"].is_string());
    assert!(body["interviewer_confirmed_at"].is_string());
}

#[tokio::test]
async fn test_interviewer_then_candidate_confirms() {
    let f = assigned_fixture().await;
    let id = &f.interview_id;

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.interviewer_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "INTERVIEWER_CONFIRMED");

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.candidate_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    assert_eq!(body["status"], "CONFIRMED");
    assert!(body["candidate_confirmed_at"].is_string());
    assert!(body["interviewer_confirmed_at"].is_string());
}

#[tokio::test]
async fn test_repeat_confirmation_is_a_noop() {
    let f = assigned_fixture().await;
    let id = &f.interview_id;

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.candidate_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let first = parse_body(res).await;

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.candidate_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let second = parse_body(res).await;

    assert_eq!(first["status"], second["status"]);
    assert_eq!(first["candidate_confirmed_at"], second["candidate_confirmed_at"]);
    assert_eq!(second["status"], "CANDIDATE_CONFIRMED");
}

#[tokio::test]
async fn test_confirmation_precondition_failures() {
    let f = assigned_fixture().await;
    let id = &f.interview_id;

    // Admins have no side in the mutual confirmation.
    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.admin_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(res).await["code"], "WRONG_ROLE");

    // An interviewer who is not the assigned one.
    let outsider = f.app.seed_user("Iris", "iris@test.com", "interviewer-pass", Role::Interviewer).await;
    f.app.seed_full_availability(&outsider.id).await;
    let outsider_auth = f.app.login("iris@test.com", "interviewer-pass").await;
    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &outsider_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(res).await["code"], "WRONG_ROLE");

    // A candidate who does not own the request.
    f.app.seed_user("Carl", "carl@test.com", "candidate-pass", Role::Candidate).await;
    let carl_auth = f.app.login("carl@test.com", "candidate-pass").await;
    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &carl_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(parse_body(res).await["code"], "WRONG_ROLE");
}

#[tokio::test]
async fn test_confirm_without_assignment_fails() {
    let app = TestApp::new().await;

    app.seed_user("Cara", "cara@test.com", "candidate-pass", Role::Candidate).await;
    let candidate_auth = app.login("cara@test.com", "candidate-pass").await;

    let date = app.future_date();
    let interview = app.create_interview(&candidate_auth, &date, "10:00").await;
    let id = interview["id"].as_str().unwrap();

    let res = app.router.clone().oneshot(app.authed_request(
        &candidate_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/confirm"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], "NOT_ASSIGNED");
}

#[tokio::test]
async fn test_confirm_via_status_patch_routes_to_coordinator() {
    let f = assigned_fixture().await;
    let id = &f.interview_id;

    // The PATCH surface accepts the confirmation statuses and funnels
    // them through the coordinator, preserving the atomic promotion.
    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.candidate_auth,
        "PATCH",
        &format!("/api/v1/interviews/{id}/status"),
        Some(json!({ "status": "CANDIDATE_CONFIRMED" })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "CANDIDATE_CONFIRMED");

    let res = f.app.router.clone().oneshot(f.app.authed_request(
        &f.interviewer_auth,
        "PATCH",
        &format!("/api/v1/interviews/{id}/status"),
        Some(json!({ "status": "INTERVIEWER_CONFIRMED" })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["status"], "CONFIRMED");
}
