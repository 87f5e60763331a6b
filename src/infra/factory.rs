use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use argon2::{password_hash::{SaltString, PasswordHasher}, Argon2};
use rand::rngs::OsRng;
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::models::status::Role;
use crate::domain::models::user::User;
use crate::domain::ports::{
    AssignmentRepository, AuthRepository, AvailabilityRepository, InterviewRepository,
    NotificationChannel, NotificationRepository, UserRepository,
};
use crate::domain::services::assignment::AssignmentEngine;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::confirmation::ConfirmationCoordinator;
use crate::domain::services::dispatcher::NotificationDispatcher;
use crate::domain::services::lifecycle::LifecycleController;
use crate::infra::channel::broadcast::BroadcastNotificationChannel;
use crate::infra::repositories::{
    postgres_assignment_repo::PostgresAssignmentRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_availability_repo::PostgresAvailabilityRepo, postgres_interview_repo::PostgresInterviewRepo,
    postgres_notification_repo::PostgresNotificationRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_assignment_repo::SqliteAssignmentRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_availability_repo::SqliteAvailabilityRepo, sqlite_interview_repo::SqliteInterviewRepo,
    sqlite_notification_repo::SqliteNotificationRepo, sqlite_user_repo::SqliteUserRepo,
};
use crate::state::AppState;

struct Repos {
    user_repo: Arc<dyn UserRepository>,
    interview_repo: Arc<dyn InterviewRepository>,
    assignment_repo: Arc<dyn AssignmentRepository>,
    availability_repo: Arc<dyn AvailabilityRepository>,
    auth_repo: Arc<dyn AuthRepository>,
    notification_repo: Arc<dyn NotificationRepository>,
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    let repos = if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        Repos {
            user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
            interview_repo: Arc::new(PostgresInterviewRepo::new(pool.clone())),
            assignment_repo: Arc::new(PostgresAssignmentRepo::new(pool.clone())),
            availability_repo: Arc::new(PostgresAvailabilityRepo::new(pool.clone())),
            auth_repo: Arc::new(PostgresAuthRepo::new(pool.clone())),
            notification_repo: Arc::new(PostgresNotificationRepo::new(pool.clone())),
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        Repos {
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            interview_repo: Arc::new(SqliteInterviewRepo::new(pool.clone())),
            assignment_repo: Arc::new(SqliteAssignmentRepo::new(pool.clone())),
            availability_repo: Arc::new(SqliteAvailabilityRepo::new(pool.clone())),
            auth_repo: Arc::new(SqliteAuthRepo::new(pool.clone())),
            notification_repo: Arc::new(SqliteNotificationRepo::new(pool.clone())),
        }
    };

    let channel: Arc<dyn NotificationChannel> = Arc::new(BroadcastNotificationChannel::new(256));

    let state = assemble_state(config.clone(), repos, channel);
    seed_admin(&state).await;
    state
}

fn assemble_state(config: Config, repos: Repos, channel: Arc<dyn NotificationChannel>) -> AppState {
    let auth_service = Arc::new(AuthService::new(repos.auth_repo.clone(), config.clone()));

    let dispatcher = Arc::new(NotificationDispatcher::new(
        repos.user_repo.clone(),
        repos.notification_repo.clone(),
        channel.clone(),
    ));
    let lifecycle = Arc::new(LifecycleController::new(
        repos.interview_repo.clone(),
        repos.assignment_repo.clone(),
        dispatcher.clone(),
    ));
    let assignment_engine = Arc::new(AssignmentEngine::new(
        repos.interview_repo.clone(),
        repos.assignment_repo.clone(),
        repos.availability_repo.clone(),
        repos.user_repo.clone(),
        lifecycle.clone(),
    ));
    let confirmation = Arc::new(ConfirmationCoordinator::new(
        repos.interview_repo.clone(),
        repos.assignment_repo.clone(),
        dispatcher.clone(),
    ));

    AppState {
        config,
        user_repo: repos.user_repo,
        interview_repo: repos.interview_repo,
        assignment_repo: repos.assignment_repo,
        availability_repo: repos.availability_repo,
        auth_repo: repos.auth_repo,
        notification_repo: repos.notification_repo,
        notification_channel: channel,
        auth_service,
        dispatcher,
        lifecycle,
        assignment_engine,
        confirmation,
    }
}

/// First-run convenience: create the admin account named in the
/// environment if it does not exist yet.
async fn seed_admin(state: &AppState) {
    let (Some(email), Some(password)) = (
        state.config.admin_email.clone(),
        state.config.admin_password.clone(),
    ) else {
        return;
    };

    match state.user_repo.find_by_email(&email).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            let salt = SaltString::generate(&mut OsRng);
            let password_hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .expect("Failed to hash admin password")
                .to_string();

            let admin = User::new("Administrator".to_string(), email.clone(), password_hash, Role::Admin);
            match state.user_repo.create(&admin).await {
                Ok(_) => info!("Seeded admin account {}", email),
                Err(e) => tracing::error!("Failed to seed admin account: {e}"),
            }
        }
        Err(e) => tracing::error!("Failed to check for admin account: {e}"),
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
