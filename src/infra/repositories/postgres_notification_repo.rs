use crate::domain::models::notification::Notification;
use crate::domain::ports::NotificationRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepo {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (id, user_id, kind, title, body, reference_id, read_at, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&notification.id).bind(&notification.user_id).bind(&notification.kind)
            .bind(&notification.title).bind(&notification.body).bind(&notification.reference_id)
            .bind(notification.read_at).bind(notification.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        )
            .bind(user_id).bind(limit)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM notifications WHERE user_id = $1 AND read_at IS NULL")
            .bind(user_id).fetch_one(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.get::<i64, _>("count"))
    }

    async fn mark_read(&self, user_id: &str, id: &str, at: DateTime<Utc>) -> Result<Option<Notification>, AppError> {
        sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET read_at = COALESCE(read_at, $1) WHERE id = $2 AND user_id = $3 RETURNING *"
        )
            .bind(at).bind(id).bind(user_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
