use std::sync::Arc;

use crate::domain::models::assignment::Assignment;
use crate::domain::models::auth::Actor;
use crate::domain::models::interview::InterviewRequest;
use crate::domain::models::status::{InterviewStatus, Role};
use crate::domain::ports::{
    AssignmentRepository, AvailabilityRepository, InterviewRepository, UserRepository,
};
use crate::domain::services::availability::{covers_slot, interview_window};
use crate::domain::services::lifecycle::{AssignmentChange, LifecycleController, TransitionOptions};
use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};

fn unavailable(interviewer_id: &str, date: NaiveDate, time: NaiveTime) -> AppError {
    AppError::SlotUnavailable {
        interviewer_id: interviewer_id.to_string(),
        date,
        time,
    }
}

/// Admin-facing selection of an interviewer for a pending request, and the
/// interviewer-facing decline that returns a request to the pool.
pub struct AssignmentEngine {
    interviews: Arc<dyn InterviewRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    availability: Arc<dyn AvailabilityRepository>,
    users: Arc<dyn UserRepository>,
    lifecycle: Arc<LifecycleController>,
}

impl AssignmentEngine {
    pub fn new(
        interviews: Arc<dyn InterviewRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        availability: Arc<dyn AvailabilityRepository>,
        users: Arc<dyn UserRepository>,
        lifecycle: Arc<LifecycleController>,
    ) -> Self {
        Self { interviews, assignments, availability, users, lifecycle }
    }

    pub async fn assign_interviewer(
        &self,
        request_id: &str,
        interviewer_id: &str,
        actor: &Actor,
    ) -> Result<InterviewRequest, AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::NotAuthorized);
        }

        let request = self
            .interviews
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interview {request_id} not found")))?;

        let from = request.current_status().ok_or(AppError::Internal)?;
        if !matches!(
            from,
            InterviewStatus::Pending | InterviewStatus::InterviewerAssigned
        ) {
            return Err(AppError::InvalidTransition {
                from,
                to: InterviewStatus::InterviewerAssigned,
            });
        }

        let interviewer = self
            .users
            .find_by_id(interviewer_id)
            .await?
            .filter(|u| u.role() == Some(Role::Interviewer))
            .ok_or_else(|| AppError::NoSuchInterviewer(interviewer_id.to_string()))?;

        let (start, end) = interview_window(request.scheduled_time)
            .ok_or_else(|| unavailable(&interviewer.id, request.scheduled_date, request.scheduled_time))?;

        let slots = self.availability.list_for_interviewer(&interviewer.id).await?;
        if !covers_slot(&slots, request.scheduled_date, start, end) {
            return Err(unavailable(&interviewer.id, request.scheduled_date, request.scheduled_time));
        }

        if self
            .assignments
            .has_confirmed_overlap(&interviewer.id, request.scheduled_date, start, end, &request.id)
            .await?
        {
            return Err(unavailable(&interviewer.id, request.scheduled_date, request.scheduled_time));
        }

        let assignment = Assignment::new(request.id.clone(), interviewer.id.clone());

        self.lifecycle
            .execute(
                request,
                InterviewStatus::InterviewerAssigned,
                actor,
                TransitionOptions::default(),
                AssignmentChange::Create(assignment),
            )
            .await
    }

    pub async fn decline_assignment(
        &self,
        request_id: &str,
        actor: &Actor,
    ) -> Result<InterviewRequest, AppError> {
        let request = self
            .interviews
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interview {request_id} not found")))?;

        let from = request.current_status().ok_or(AppError::Internal)?;
        if from != InterviewStatus::InterviewerAssigned {
            return Err(AppError::InvalidTransition { from, to: InterviewStatus::Pending });
        }

        let active = self
            .assignments
            .find_active(&request.id)
            .await?
            .ok_or_else(|| AppError::NotAssigned(request.id.clone()))?;

        if actor.role != Role::Interviewer || active.interviewer_id != actor.id {
            return Err(AppError::NotAuthorized);
        }

        self.lifecycle
            .execute(
                request,
                InterviewStatus::Pending,
                actor,
                TransitionOptions::default(),
                AssignmentChange::Decline,
            )
            .await
    }
}
