use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::models::auth::Actor;
use crate::domain::models::interview::{ConfirmingParty, InterviewRequest};
use crate::domain::models::status::{InterviewStatus, Role};
use crate::domain::ports::{AssignmentRepository, InterviewRepository};
use crate::domain::services::dispatcher::{LifecycleEvent, NotificationDispatcher};
use crate::error::AppError;

/// Tracks the two independent confirmation flags and promotes the request
/// to CONFIRMED once both are set. The timestamp write and the
/// check-and-promote happen in one atomic repository update, so two
/// near-simultaneous confirmations serialize on the row and exactly one of
/// them observes the promotion.
pub struct ConfirmationCoordinator {
    interviews: Arc<dyn InterviewRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl ConfirmationCoordinator {
    pub fn new(
        interviews: Arc<dyn InterviewRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self { interviews, assignments, dispatcher }
    }

    pub async fn confirm_as_candidate(
        &self,
        request_id: &str,
        actor: &Actor,
    ) -> Result<InterviewRequest, AppError> {
        self.confirm(request_id, actor, ConfirmingParty::Candidate).await
    }

    pub async fn confirm_as_interviewer(
        &self,
        request_id: &str,
        actor: &Actor,
    ) -> Result<InterviewRequest, AppError> {
        self.confirm(request_id, actor, ConfirmingParty::Interviewer).await
    }

    async fn confirm(
        &self,
        request_id: &str,
        actor: &Actor,
        party: ConfirmingParty,
    ) -> Result<InterviewRequest, AppError> {
        let request = self
            .interviews
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interview {request_id} not found")))?;

        let from = request.current_status().ok_or(AppError::Internal)?;
        if from.is_terminal() {
            return Err(AppError::AlreadyTerminal { id: request.id, status: from });
        }

        let active = self
            .assignments
            .find_active(&request.id)
            .await?
            .ok_or_else(|| AppError::NotAssigned(request.id.clone()))?;

        let (own_confirmed_at, target) = match party {
            ConfirmingParty::Candidate => {
                if actor.role != Role::Candidate || actor.id != request.candidate_id {
                    return Err(AppError::WrongRole);
                }
                (request.candidate_confirmed_at, InterviewStatus::CandidateConfirmed)
            }
            ConfirmingParty::Interviewer => {
                if actor.role != Role::Interviewer || actor.id != active.interviewer_id {
                    return Err(AppError::WrongRole);
                }
                (request.interviewer_confirmed_at, InterviewStatus::InterviewerConfirmed)
            }
        };

        // Retried client requests are a no-op, not an error; no second
        // event is emitted either.
        if own_confirmed_at.is_some() {
            return Ok(request);
        }

        if !matches!(
            from,
            InterviewStatus::InterviewerAssigned
                | InterviewStatus::CandidateConfirmed
                | InterviewStatus::InterviewerConfirmed
        ) {
            return Err(AppError::InvalidTransition { from, to: target });
        }

        let updated = self
            .interviews
            .confirm(&request.id, party, &actor.id, Utc::now())
            .await?
            .ok_or(AppError::ConcurrencyConflict)?;

        let to = updated.current_status().ok_or(AppError::Internal)?;
        info!(
            "interview {} confirmation by {} ({}): {} -> {}",
            updated.id, actor.id, actor.role, from, to
        );

        let event = LifecycleEvent {
            request_id: updated.id.clone(),
            from,
            to,
            actor_id: actor.id.clone(),
            actor_role: actor.role,
            rescheduled: false,
        };

        self.dispatcher
            .dispatch(&event, &updated, Some(active.interviewer_id.as_str()), None)
            .await;

        Ok(updated)
    }
}
