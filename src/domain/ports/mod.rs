use crate::domain::models::{
    assignment::Assignment,
    auth::RefreshTokenRecord,
    availability::AvailabilitySlot,
    interview::{ConfirmingParty, InterviewRequest},
    notification::Notification,
    status::{InterviewStatus, Role},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Everything a single status transition writes, applied as one
/// conditional update guarded on the status the caller read. Assignment
/// changes ride in the same transaction so a lost CAS leaves no orphan
/// rows.
#[derive(Debug)]
pub struct TransitionWrite {
    pub to: InterviewStatus,
    pub schedule: Option<(NaiveDate, NaiveTime)>,
    pub meeting_url: Option<String>,
    pub force_confirmed: bool,
    pub reset_confirmations: bool,
    pub new_assignment: Option<Assignment>,
    /// Id of the assignment being declined; the write only lands if that
    /// row is still the active one.
    pub decline_assignment: Option<String>,
}

#[derive(Debug)]
pub struct AppliedTransition {
    pub request: InterviewRequest,
    /// Active assignment replaced by `new_assignment`, if any.
    pub superseded: Option<Assignment>,
}

#[async_trait]
pub trait InterviewRepository: Send + Sync {
    async fn create(&self, request: &InterviewRequest) -> Result<InterviewRequest, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<InterviewRequest>, AppError>;
    async fn list_all(&self) -> Result<Vec<InterviewRequest>, AppError>;
    async fn list_by_candidate(&self, candidate_id: &str) -> Result<Vec<InterviewRequest>, AppError>;
    async fn list_assigned_to(&self, interviewer_id: &str) -> Result<Vec<InterviewRequest>, AppError>;
    /// Candidate edit of a still-pending request; `None` if the request is
    /// no longer PENDING.
    async fn update_pending_details(&self, request: &InterviewRequest) -> Result<Option<InterviewRequest>, AppError>;
    /// Apply a transition conditionally: the write only lands if the
    /// stored status still equals `current.status`. `None` signals a
    /// concurrent modification.
    async fn apply_transition(&self, current: &InterviewRequest, write: &TransitionWrite) -> Result<Option<AppliedTransition>, AppError>;
    /// Record one party's confirmation and promote to CONFIRMED in the
    /// same statement when the other party already confirmed. The
    /// statement itself verifies `actor_id` still matches the candidate
    /// or the active assignment's interviewer. `None` if the request left
    /// the confirmable statuses, or the actor lost that role,
    /// concurrently.
    async fn confirm(&self, id: &str, party: ConfirmingParty, actor_id: &str, at: DateTime<Utc>) -> Result<Option<InterviewRequest>, AppError>;
    /// Delete a request and its assignment rows in one transaction.
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    async fn find_active(&self, request_id: &str) -> Result<Option<Assignment>, AppError>;
    async fn list_for_request(&self, request_id: &str) -> Result<Vec<Assignment>, AppError>;
    /// Whether the interviewer already holds an active assignment on a
    /// CONFIRMED request overlapping [start, end) on `date`.
    async fn has_confirmed_overlap(
        &self,
        interviewer_id: &str,
        date: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
        exclude_request_id: &str,
    ) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn create(&self, slot: &AvailabilitySlot) -> Result<AvailabilitySlot, AppError>;
    async fn list_for_interviewer(&self, interviewer_id: &str) -> Result<Vec<AvailabilitySlot>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<Notification, AppError>;
    async fn list_for_user(&self, user_id: &str, limit: i64) -> Result<Vec<Notification>, AppError>;
    async fn unread_count(&self, user_id: &str) -> Result<i64, AppError>;
    async fn mark_read(&self, user_id: &str, id: &str, at: DateTime<Utc>) -> Result<Option<Notification>, AppError>;
}

/// Fire-and-forget push to whatever transport the deployment wires in.
/// Delivery is best-effort; the core never depends on it succeeding.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, user_id: &str, notification: &Notification) -> Result<(), AppError>;
}
