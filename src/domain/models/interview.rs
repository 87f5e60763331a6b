use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use std::fmt;

use crate::domain::models::status::InterviewStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewType {
    Technical,
    Behavioral,
    Mock,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "TECHNICAL",
            InterviewType::Behavioral => "BEHAVIORAL",
            InterviewType::Mock => "MOCK",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "TECHNICAL" => Some(InterviewType::Technical),
            "BEHAVIORAL" => Some(InterviewType::Behavioral),
            "MOCK" => Some(InterviewType::Mock),
            _ => None,
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the mutual confirmation a confirm call speaks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmingParty {
    Candidate,
    Interviewer,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct InterviewRequest {
    pub id: String,
    pub candidate_id: String,
    pub interview_type: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub status: String,
    pub meeting_url: Option<String>,
    pub additional_info: Option<String>,
    pub candidate_confirmed_at: Option<DateTime<Utc>>,
    pub interviewer_confirmed_at: Option<DateTime<Utc>>,
    pub admin_force_confirmed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewInterviewParams {
    pub interview_type: InterviewType,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub additional_info: Option<String>,
}

impl InterviewRequest {
    pub fn new(candidate_id: String, params: NewInterviewParams) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            candidate_id,
            interview_type: params.interview_type.as_str().to_string(),
            scheduled_date: params.scheduled_date,
            scheduled_time: params.scheduled_time,
            status: InterviewStatus::Pending.as_str().to_string(),
            meeting_url: None,
            additional_info: params.additional_info,
            candidate_confirmed_at: None,
            interviewer_confirmed_at: None,
            admin_force_confirmed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Parsed status; `None` only if the stored string was corrupted
    /// outside this application.
    pub fn current_status(&self) -> Option<InterviewStatus> {
        InterviewStatus::parse(&self.status)
    }
}
