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

#[tokio::test]
async fn test_assignment_fans_out_to_interviewer_and_candidate() {
    let app = TestApp::new().await;

    app.seed_user("Admin", "admin@test.com", "admin-pass", Role::Admin).await;
    app.seed_user("Cara", "cara@test.com", "candidate-pass", Role::Candidate).await;
    let interviewer = app.seed_user("Ivan", "ivan@test.com", "interviewer-pass", Role::Interviewer).await;
    app.seed_full_availability(&interviewer.id).await;

    let candidate_auth = app.login("cara@test.com", "candidate-pass").await;
    let admin_auth = app.login("admin@test.com", "admin-pass").await;
    let interviewer_auth = app.login("ivan@test.com", "interviewer-pass").await;

    let date = app.future_date();
    let interview = app.create_interview(&candidate_auth, &date, "10:00").await;
    let id = interview["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(app.authed_request(
        &admin_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/assign"),
        Some(json!({ "interviewer_id": interviewer.id })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // The interviewer has one unread feed entry for the assignment.
    let res = app.router.clone().oneshot(app.authed_request(
        &interviewer_auth,
        "GET",
        "/api/v1/notifications/unread-count",
        None,
    )).await.unwrap();
    assert_eq!(parse_body(res).await["count"], 1);

    let res = app.router.clone().oneshot(app.authed_request(
        &interviewer_auth,
        "GET",
        "/api/v1/notifications",
        None,
    )).await.unwrap();
    let feed = parse_body(res).await;
    let entries = feed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "INTERVIEW_ASSIGNED");
    assert_eq!(entries[0]["reference_id"], id.as_str());
    assert!(entries[0]["read_at"].is_null());

    // The candidate heard about it too.
    let res = app.router.clone().oneshot(app.authed_request(
        &candidate_auth,
        "GET",
        "/api/v1/notifications",
        None,
    )).await.unwrap();
    let feed = parse_body(res).await;
    assert_eq!(feed.as_array().unwrap()[0]["kind"], "INTERVIEW_STATUS");

    // And every delivery went through the publish channel.
    let published = app.channel.published.lock().unwrap();
    assert!(published.iter().any(|(user, kind)| user == &interviewer.id && kind == "INTERVIEW_ASSIGNED"));
    assert!(published.iter().any(|(_, kind)| kind == "INTERVIEW_STATUS"));
}

#[tokio::test]
async fn test_decline_and_cancel_notify_admins() {
    let app = TestApp::new().await;

    let admin = app.seed_user("Admin", "admin@test.com", "admin-pass", Role::Admin).await;
    app.seed_user("Cara", "cara@test.com", "candidate-pass", Role::Candidate).await;
    let interviewer = app.seed_user("Ivan", "ivan@test.com", "interviewer-pass", Role::Interviewer).await;
    app.seed_full_availability(&interviewer.id).await;

    let candidate_auth = app.login("cara@test.com", "candidate-pass").await;
    let admin_auth = app.login("admin@test.com", "admin-pass").await;
    let interviewer_auth = app.login("ivan@test.com", "interviewer-pass").await;

    let date = app.future_date();
    let interview = app.create_interview(&candidate_auth, &date, "10:00").await;
    let id = interview["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(app.authed_request(
        &admin_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/assign"),
        Some(json!({ "interviewer_id": interviewer.id })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    // Decline drops the request back into the pool and pings the admins.
    let res = app.router.clone().oneshot(app.authed_request(
        &interviewer_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/decline"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(app.authed_request(
        &admin_auth,
        "GET",
        "/api/v1/notifications",
        None,
    )).await.unwrap();
    let feed = parse_body(res).await;
    assert!(feed.as_array().unwrap().iter().any(|n| n["kind"] == "ADMIN_ATTENTION"));

    // A candidate cancellation is also admin-visible.
    let res = app.router.clone().oneshot(app.authed_request(
        &candidate_auth,
        "PATCH",
        &format!("/api/v1/interviews/{id}/status"),
        Some(json!({ "status": "CANCELLED" })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let published = app.channel.published.lock().unwrap();
    assert!(published.iter().filter(|(user, kind)| user == &admin.id && kind == "ADMIN_ATTENTION").count() >= 2);
}

#[tokio::test]
async fn test_reassignment_notifies_the_replaced_interviewer() {
    let app = TestApp::new().await;

    app.seed_user("Admin", "admin@test.com", "admin-pass", Role::Admin).await;
    app.seed_user("Cara", "cara@test.com", "candidate-pass", Role::Candidate).await;
    let first = app.seed_user("Ivan", "ivan@test.com", "interviewer-pass", Role::Interviewer).await;
    let second = app.seed_user("Iris", "iris@test.com", "interviewer-pass", Role::Interviewer).await;
    app.seed_full_availability(&first.id).await;
    app.seed_full_availability(&second.id).await;

    let candidate_auth = app.login("cara@test.com", "candidate-pass").await;
    let admin_auth = app.login("admin@test.com", "admin-pass").await;

    let date = app.future_date();
    let interview = app.create_interview(&candidate_auth, &date, "10:00").await;
    let id = interview["id"].as_str().unwrap().to_string();

    for interviewer_id in [&first.id, &second.id] {
        let res = app.router.clone().oneshot(app.authed_request(
            &admin_auth,
            "POST",
            &format!("/api/v1/interviews/{id}/assign"),
            Some(json!({ "interviewer_id": interviewer_id })),
        )).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }

    let published = app.channel.published.lock().unwrap();
    assert!(published.iter().any(|(user, kind)| user == &first.id && kind == "INTERVIEW_REASSIGNED"));
    assert!(published.iter().any(|(user, kind)| user == &second.id && kind == "INTERVIEW_ASSIGNED"));
}

#[tokio::test]
async fn test_mark_read_is_owner_scoped() {
    let app = TestApp::new().await;

    app.seed_user("Admin", "admin@test.com", "admin-pass", Role::Admin).await;
    app.seed_user("Cara", "cara@test.com", "candidate-pass", Role::Candidate).await;
    let interviewer = app.seed_user("Ivan", "ivan@test.com", "interviewer-pass", Role::Interviewer).await;
    app.seed_full_availability(&interviewer.id).await;

    let candidate_auth = app.login("cara@test.com", "candidate-pass").await;
    let admin_auth = app.login("admin@test.com", "admin-pass").await;
    let interviewer_auth = app.login("ivan@test.com", "interviewer-pass").await;

    let date = app.future_date();
    let interview = app.create_interview(&candidate_auth, &date, "10:00").await;
    let id = interview["id"].as_str().unwrap().to_string();

    let res = app.router.clone().oneshot(app.authed_request(
        &admin_auth,
        "POST",
        &format!("/api/v1/interviews/{id}/assign"),
        Some(json!({ "interviewer_id": interviewer.id })),
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = app.router.clone().oneshot(app.authed_request(
        &interviewer_auth,
        "GET",
        "/api/v1/notifications",
        None,
    )).await.unwrap();
    let feed = parse_body(res).await;
    let notification_id = feed.as_array().unwrap()[0]["id"].as_str().unwrap().to_string();

    // Another user cannot mark it.
    let res = app.router.clone().oneshot(app.authed_request(
        &candidate_auth,
        "PATCH",
        &format!("/api/v1/notifications/{notification_id}/read"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // The owner can, and the unread count drops.
    let res = app.router.clone().oneshot(app.authed_request(
        &interviewer_auth,
        "PATCH",
        &format!("/api/v1/notifications/{notification_id}/read"),
        None,
    )).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(parse_body(res).await["read_at"].is_string());

    let res = app.router.clone().oneshot(app.authed_request(
        &interviewer_auth,
        "GET",
        "/api/v1/notifications/unread-count",
        None,
    )).await.unwrap();
    assert_eq!(parse_body(res).await["count"], 0);
}
