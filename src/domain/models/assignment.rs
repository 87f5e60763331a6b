use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Link between an interview request and the interviewer expected to run
/// it. `declined_at` means the interviewer bounced it back; `superseded_at`
/// means an admin reassigned over it. Both are kept for history; at most
/// one row per request has neither set.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Assignment {
    pub id: String,
    pub interview_request_id: String,
    pub interviewer_id: String,
    pub assigned_at: DateTime<Utc>,
    pub declined_at: Option<DateTime<Utc>>,
    pub superseded_at: Option<DateTime<Utc>>,
}

impl Assignment {
    pub fn new(interview_request_id: String, interviewer_id: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            interview_request_id,
            interviewer_id,
            assigned_at: Utc::now(),
            declined_at: None,
            superseded_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.declined_at.is_none() && self.superseded_at.is_none()
    }
}
