use crate::domain::models::availability::AvailabilitySlot;
use crate::domain::ports::AvailabilityRepository;
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAvailabilityRepo {
    pool: PgPool,
}

impl PostgresAvailabilityRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityRepository for PostgresAvailabilityRepo {
    async fn create(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, AppError> {
        sqlx::query_as::<_, AvailabilitySlot>(
            "INSERT INTO availability_slots (id, interviewer_id, day_of_week, specific_date, start_time, end_time, is_recurring)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&slot.id).bind(&slot.interviewer_id).bind(slot.day_of_week)
            .bind(slot.specific_date).bind(slot.start_time).bind(slot.end_time)
            .bind(slot.is_recurring)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_interviewer(&self, interviewer_id: &str) -> Result<Vec<AvailabilitySlot>, AppError> {
        sqlx::query_as::<_, AvailabilitySlot>(
            "SELECT * FROM availability_slots WHERE interviewer_id = $1 ORDER BY start_time"
        )
            .bind(interviewer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
