use crate::domain::models::{assignment::Assignment, interview::{ConfirmingParty, InterviewRequest}};
use crate::domain::ports::{AppliedTransition, InterviewRepository, TransitionWrite};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresInterviewRepo {
    pool: PgPool,
}

impl PostgresInterviewRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewRepository for PostgresInterviewRepo {
    async fn create(&self, request: &InterviewRequest) -> Result<InterviewRequest, AppError> {
        sqlx::query_as::<_, InterviewRequest>(
            "INSERT INTO interview_requests (id, candidate_id, interview_type, scheduled_date, scheduled_time, status, meeting_url, additional_info, candidate_confirmed_at, interviewer_confirmed_at, admin_force_confirmed, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *"
        )
            .bind(&request.id).bind(&request.candidate_id).bind(&request.interview_type)
            .bind(request.scheduled_date).bind(request.scheduled_time).bind(&request.status)
            .bind(&request.meeting_url).bind(&request.additional_info)
            .bind(request.candidate_confirmed_at).bind(request.interviewer_confirmed_at)
            .bind(request.admin_force_confirmed).bind(request.created_at).bind(request.updated_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<InterviewRequest>, AppError> {
        sqlx::query_as::<_, InterviewRequest>("SELECT * FROM interview_requests WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<InterviewRequest>, AppError> {
        sqlx::query_as::<_, InterviewRequest>("SELECT * FROM interview_requests ORDER BY scheduled_date, scheduled_time")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_candidate(&self, candidate_id: &str) -> Result<Vec<InterviewRequest>, AppError> {
        sqlx::query_as::<_, InterviewRequest>("SELECT * FROM interview_requests WHERE candidate_id = $1 ORDER BY scheduled_date, scheduled_time")
            .bind(candidate_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_assigned_to(&self, interviewer_id: &str) -> Result<Vec<InterviewRequest>, AppError> {
        sqlx::query_as::<_, InterviewRequest>(
            "SELECT r.* FROM interview_requests r
             JOIN assignments a ON a.interview_request_id = r.id
             WHERE a.interviewer_id = $1 AND a.declined_at IS NULL AND a.superseded_at IS NULL
             ORDER BY r.scheduled_date, r.scheduled_time"
        )
            .bind(interviewer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update_pending_details(&self, request: &InterviewRequest) -> Result<Option<InterviewRequest>, AppError> {
        sqlx::query_as::<_, InterviewRequest>(
            "UPDATE interview_requests SET interview_type = $1, scheduled_date = $2, scheduled_time = $3, additional_info = $4, updated_at = $5
             WHERE id = $6 AND status = 'PENDING'
             RETURNING *"
        )
            .bind(&request.interview_type).bind(request.scheduled_date).bind(request.scheduled_time)
            .bind(&request.additional_info).bind(Utc::now())
            .bind(&request.id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn apply_transition(&self, current: &InterviewRequest, write: &TransitionWrite) -> Result<Option<AppliedTransition>, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let now = Utc::now();

        let (date, time) = write.schedule.unwrap_or((current.scheduled_date, current.scheduled_time));
        let meeting_url = write.meeting_url.clone().or_else(|| current.meeting_url.clone());
        let (candidate_confirmed_at, interviewer_confirmed_at) = if write.reset_confirmations {
            (None, None)
        } else {
            (current.candidate_confirmed_at, current.interviewer_confirmed_at)
        };
        let force_confirmed = current.admin_force_confirmed || write.force_confirmed;

        // The guard on the previously read status is the optimistic check:
        // a transition computed against a stale read matches zero rows.
        let updated = sqlx::query_as::<_, InterviewRequest>(
            "UPDATE interview_requests
             SET status = $1, scheduled_date = $2, scheduled_time = $3, meeting_url = $4, candidate_confirmed_at = $5, interviewer_confirmed_at = $6, admin_force_confirmed = $7, updated_at = $8
             WHERE id = $9 AND status = $10
             RETURNING *"
        )
            .bind(write.to.as_str()).bind(date).bind(time).bind(&meeting_url)
            .bind(candidate_confirmed_at).bind(interviewer_confirmed_at)
            .bind(force_confirmed).bind(now)
            .bind(&current.id).bind(&current.status)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        let mut superseded = None;
        if let Some(assignment) = &write.new_assignment {
            superseded = sqlx::query_as::<_, Assignment>(
                "UPDATE assignments SET superseded_at = $1
                 WHERE interview_request_id = $2 AND declined_at IS NULL AND superseded_at IS NULL
                 RETURNING *"
            )
                .bind(now).bind(&current.id)
                .fetch_optional(&mut *tx).await.map_err(AppError::Database)?;

            sqlx::query(
                "INSERT INTO assignments (id, interview_request_id, interviewer_id, assigned_at, declined_at, superseded_at) VALUES ($1, $2, $3, $4, $5, $6)"
            )
                .bind(&assignment.id).bind(&assignment.interview_request_id).bind(&assignment.interviewer_id)
                .bind(assignment.assigned_at).bind(assignment.declined_at).bind(assignment.superseded_at)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        if let Some(assignment_id) = &write.decline_assignment {
            let result = sqlx::query(
                "UPDATE assignments SET declined_at = $1
                 WHERE id = $2 AND declined_at IS NULL AND superseded_at IS NULL"
            )
                .bind(now).bind(assignment_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
            // The assignment was replaced under us; drop the whole write.
            if result.rows_affected() == 0 {
                return Ok(None);
            }
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(Some(AppliedTransition { request: updated, superseded }))
    }

    async fn confirm(&self, id: &str, party: ConfirmingParty, actor_id: &str, at: DateTime<Utc>) -> Result<Option<InterviewRequest>, AppError> {
        // Single statement: the timestamp write and the check-and-promote
        // serialize on the row, so concurrent confirmations cannot both
        // miss each other. The identity guard makes a confirmation lose
        // cleanly if the actor's role was revoked in between (e.g. an
        // interviewer superseded by a reassignment).
        let sql = match party {
            ConfirmingParty::Candidate =>
                "UPDATE interview_requests
                 SET candidate_confirmed_at = COALESCE(candidate_confirmed_at, $1),
                     status = CASE WHEN interviewer_confirmed_at IS NOT NULL THEN 'CONFIRMED' ELSE 'CANDIDATE_CONFIRMED' END,
                     updated_at = $2
                 WHERE id = $3 AND candidate_id = $4
                   AND status IN ('INTERVIEWER_ASSIGNED', 'CANDIDATE_CONFIRMED', 'INTERVIEWER_CONFIRMED')
                 RETURNING *",
            ConfirmingParty::Interviewer =>
                "UPDATE interview_requests
                 SET interviewer_confirmed_at = COALESCE(interviewer_confirmed_at, $1),
                     status = CASE WHEN candidate_confirmed_at IS NOT NULL THEN 'CONFIRMED' ELSE 'INTERVIEWER_CONFIRMED' END,
                     updated_at = $2
                 WHERE id = $3
                   AND EXISTS (
                       SELECT 1 FROM assignments a
                       WHERE a.interview_request_id = interview_requests.id
                         AND a.interviewer_id = $4
                         AND a.declined_at IS NULL AND a.superseded_at IS NULL
                   )
                   AND status IN ('INTERVIEWER_ASSIGNED', 'CANDIDATE_CONFIRMED', 'INTERVIEWER_CONFIRMED')
                 RETURNING *",
        };

        sqlx::query_as::<_, InterviewRequest>(sql)
            .bind(at).bind(at).bind(id).bind(actor_id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("DELETE FROM assignments WHERE interview_request_id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM interview_requests WHERE id = $1")
            .bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Interview not found".into()));
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
