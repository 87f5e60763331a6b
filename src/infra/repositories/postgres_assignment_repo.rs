use crate::domain::models::assignment::Assignment;
use crate::domain::ports::AssignmentRepository;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use sqlx::{PgPool, Row};

pub struct PostgresAssignmentRepo {
    pool: PgPool,
}

impl PostgresAssignmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssignmentRepository for PostgresAssignmentRepo {
    async fn find_active(&self, request_id: &str) -> Result<Option<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE interview_request_id = $1 AND declined_at IS NULL AND superseded_at IS NULL"
        )
            .bind(request_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_request(&self, request_id: &str) -> Result<Vec<Assignment>, AppError> {
        sqlx::query_as::<_, Assignment>(
            "SELECT * FROM assignments WHERE interview_request_id = $1 ORDER BY assigned_at"
        )
            .bind(request_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn has_confirmed_overlap(
        &self,
        interviewer_id: &str,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude_request_id: &str,
    ) -> Result<bool, AppError> {
        let result = sqlx::query(
            "SELECT COUNT(*) as count FROM assignments a
             JOIN interview_requests r ON r.id = a.interview_request_id
             WHERE a.interviewer_id = $1 AND a.declined_at IS NULL AND a.superseded_at IS NULL
               AND r.id != $2 AND r.status = 'CONFIRMED' AND r.scheduled_date = $3
               AND r.scheduled_time < $4 AND r.scheduled_time + interval '60 minutes' > $5"
        )
            .bind(interviewer_id).bind(exclude_request_id).bind(date)
            .bind(end).bind(start)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?;

        Ok(result.get::<i64, _>("count") > 0)
    }
}
