use interview_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::availability::AvailabilitySlot,
    domain::models::notification::Notification,
    domain::models::status::Role,
    domain::models::user::User,
    domain::ports::NotificationChannel,
    domain::services::assignment::AssignmentEngine,
    domain::services::auth_service::AuthService,
    domain::services::confirmation::ConfirmationCoordinator,
    domain::services::dispatcher::NotificationDispatcher,
    domain::services::lifecycle::LifecycleController,
    infra::repositories::{
        sqlite_assignment_repo::SqliteAssignmentRepo,
        sqlite_auth_repo::SqliteAuthRepo,
        sqlite_availability_repo::SqliteAvailabilityRepo,
        sqlite_interview_repo::SqliteInterviewRepo,
        sqlite_notification_repo::SqliteNotificationRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use chrono::{Datelike, Duration as ChronoDuration, NaiveTime, Utc};
use tower::ServiceExt;
use serde_json::Value;

/// Records every publish so tests can assert on the fan-out without a
/// real transport.
pub struct RecordingChannel {
    pub published: Mutex<Vec<(String, String)>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self { published: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    async fn publish(&self, user_id: &str, notification: &Notification) -> Result<(), AppError> {
        self.published.lock().unwrap().push((user_id.to_string(), notification.kind.clone()));
        Ok(())
    }
}

pub struct AuthHeaders {
    pub access_token: String,
    pub csrf_token: String,
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub channel: Arc<RecordingChannel>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret: "test-secret-key-for-integration-tests".to_string(),
            auth_issuer: "test-issuer".to_string(),
            admin_email: None,
            admin_password: None,
        };

        let user_repo = Arc::new(SqliteUserRepo::new(pool.clone()));
        let interview_repo = Arc::new(SqliteInterviewRepo::new(pool.clone()));
        let assignment_repo = Arc::new(SqliteAssignmentRepo::new(pool.clone()));
        let availability_repo = Arc::new(SqliteAvailabilityRepo::new(pool.clone()));
        let auth_repo = Arc::new(SqliteAuthRepo::new(pool.clone()));
        let notification_repo = Arc::new(SqliteNotificationRepo::new(pool.clone()));

        let channel = Arc::new(RecordingChannel::new());
        let auth_service = Arc::new(AuthService::new(auth_repo.clone(), config.clone()));

        let dispatcher = Arc::new(NotificationDispatcher::new(
            user_repo.clone(),
            notification_repo.clone(),
            channel.clone(),
        ));
        let lifecycle = Arc::new(LifecycleController::new(
            interview_repo.clone(),
            assignment_repo.clone(),
            dispatcher.clone(),
        ));
        let assignment_engine = Arc::new(AssignmentEngine::new(
            interview_repo.clone(),
            assignment_repo.clone(),
            availability_repo.clone(),
            user_repo.clone(),
            lifecycle.clone(),
        ));
        let confirmation = Arc::new(ConfirmationCoordinator::new(
            interview_repo.clone(),
            assignment_repo.clone(),
            dispatcher.clone(),
        ));

        let state = Arc::new(AppState {
            config,
            user_repo,
            interview_repo,
            assignment_repo,
            availability_repo,
            auth_repo,
            notification_repo,
            notification_channel: channel.clone(),
            auth_service,
            dispatcher,
            lifecycle,
            assignment_engine,
            confirmation,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            channel,
        }
    }

    /// Insert a user directly; tests that need an admin or interviewer
    /// cannot go through the candidate-only register endpoint.
    pub async fn seed_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
        use rand::rngs::OsRng;

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .unwrap()
            .to_string();

        let user = User::new(name.to_string(), email.to_string(), password_hash, role);
        self.state.user_repo.create(&user).await.unwrap()
    }

    /// Weekday-recurring 09:00-17:00 window so any slot used by the tests
    /// is covered.
    pub async fn seed_full_availability(&self, interviewer_id: &str) {
        for day in 0..7 {
            let slot = AvailabilitySlot::recurring(
                interviewer_id.to_string(),
                day,
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            );
            self.state.availability_repo.create(&slot).await.unwrap();
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthHeaders {
        let payload = serde_json::json!({
            "email": email,
            "password": password
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let cookies: Vec<String> = response.headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|h| h.to_str().unwrap().to_string())
            .collect();

        let access_token_cookie = cookies.iter()
            .find(|c| c.contains("access_token="))
            .expect("No access_token cookie returned");

        let start = access_token_cookie.find("access_token=").unwrap() + 13;
        let end = access_token_cookie[start..].find(';').unwrap_or(access_token_cookie.len() - start);
        let access_token = access_token_cookie[start..start+end].to_string();

        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body_json: Value = serde_json::from_slice(&body_bytes).unwrap();
        let csrf_token = body_json["csrf_token"].as_str().expect("No csrf_token in body").to_string();

        AuthHeaders {
            access_token,
            csrf_token
        }
    }

    /// A date at least a week out; weekday is irrelevant given
    /// [`Self::seed_full_availability`].
    pub fn future_date(&self) -> String {
        let mut date = Utc::now() + ChronoDuration::days(7);
        // Avoid landing on a month boundary ambiguity in assertions.
        if date.day() >= 28 {
            date += ChronoDuration::days(4);
        }
        date.format("%Y-%m-%d").to_string()
    }

    pub async fn create_interview(&self, auth: &AuthHeaders, date: &str, time: &str) -> Value {
        let payload = serde_json::json!({
            "interview_type": "TECHNICAL",
            "date": date,
            "time": time,
            "additional_info": "Focus on systems design"
        });

        let response = self.router.clone().oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/interviews")
                .header(header::COOKIE, format!("access_token={}", auth.access_token))
                .header("X-CSRF-Token", &auth.csrf_token)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        assert_eq!(response.status(), 201, "interview creation failed");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn authed_request(&self, auth: &AuthHeaders, method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token);

        if body.is_some() {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
        }

        builder.body(match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        }).unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
