use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::domain::models::assignment::Assignment;
use crate::domain::models::auth::Actor;
use crate::domain::models::interview::InterviewRequest;
use crate::domain::models::status::{authorities, InterviewStatus, Role, TransitionAuthority};
use crate::domain::ports::{AssignmentRepository, InterviewRepository, TransitionWrite};
use crate::domain::services::dispatcher::{LifecycleEvent, NotificationDispatcher};
use crate::error::AppError;

/// Caller-supplied extras applied atomically with the status write.
#[derive(Debug, Default, Clone)]
pub struct TransitionOptions {
    /// New slot; its presence marks the transition as a reschedule.
    pub reschedule: Option<(NaiveDate, NaiveTime)>,
    pub meeting_url: Option<String>,
}

/// Structural side effects of a transition on the assignment rows. Only
/// the assignment engine produces the non-`None` variants.
pub(crate) enum AssignmentChange {
    None,
    Create(Assignment),
    Decline,
}

/// The single code path that mutates `status`. Validates the (from, to)
/// pair and the actor against the transition table, applies the write as
/// one conditional update, and emits the lifecycle event only after the
/// commit.
pub struct LifecycleController {
    interviews: Arc<dyn InterviewRepository>,
    assignments: Arc<dyn AssignmentRepository>,
    dispatcher: Arc<NotificationDispatcher>,
}

impl LifecycleController {
    pub fn new(
        interviews: Arc<dyn InterviewRepository>,
        assignments: Arc<dyn AssignmentRepository>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self { interviews, assignments, dispatcher }
    }

    /// The generic transition surface. Transitions with structural side
    /// effects on assignments (assign, decline, the confirmation pair) go
    /// through their dedicated operations instead, which funnel back into
    /// [`Self::execute`].
    pub async fn transition(
        &self,
        request_id: &str,
        target: InterviewStatus,
        actor: &Actor,
        options: TransitionOptions,
    ) -> Result<InterviewRequest, AppError> {
        match target {
            InterviewStatus::InterviewerAssigned => {
                return Err(AppError::Validation(
                    "Assigning an interviewer requires the assign operation".into(),
                ));
            }
            InterviewStatus::Pending => {
                return Err(AppError::Validation(
                    "Returning a request to PENDING goes through the decline operation".into(),
                ));
            }
            InterviewStatus::CandidateConfirmed | InterviewStatus::InterviewerConfirmed => {
                return Err(AppError::Validation(
                    "Confirmations go through the confirm operation".into(),
                ));
            }
            _ => {}
        }

        let request = self
            .interviews
            .find_by_id(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Interview {request_id} not found")))?;

        self.execute(request, target, actor, options, AssignmentChange::None).await
    }

    pub(crate) async fn execute(
        &self,
        request: InterviewRequest,
        target: InterviewStatus,
        actor: &Actor,
        options: TransitionOptions,
        change: AssignmentChange,
    ) -> Result<InterviewRequest, AppError> {
        let from = request.current_status().ok_or(AppError::Internal)?;

        let allowed = authorities(from, target);
        if allowed.is_empty() {
            return Err(AppError::InvalidTransition { from, to: target });
        }

        let active = self.assignments.find_active(&request.id).await?;
        let satisfied = allowed.iter().any(|authority| match authority {
            TransitionAuthority::Admin => actor.role == Role::Admin,
            TransitionAuthority::OwningCandidate => {
                actor.role == Role::Candidate && actor.id == request.candidate_id
            }
            TransitionAuthority::AssignedInterviewer => {
                actor.role == Role::Interviewer
                    && active.as_ref().is_some_and(|a| a.interviewer_id == actor.id)
            }
            TransitionAuthority::System => false,
        });
        if !satisfied {
            return Err(AppError::NotAuthorized);
        }

        let decline_assignment = if matches!(change, AssignmentChange::Decline) {
            // Authorization above guarantees an active assignment here;
            // pinning its id makes the decline lose cleanly if an admin
            // reassigns in between.
            Some(
                active
                    .as_ref()
                    .map(|a| a.id.clone())
                    .ok_or_else(|| AppError::NotAssigned(request.id.clone()))?,
            )
        } else {
            None
        };

        let write = TransitionWrite {
            to: target,
            schedule: options.reschedule,
            meeting_url: options.meeting_url,
            force_confirmed: from == InterviewStatus::Pending && target == InterviewStatus::Confirmed,
            // Assignment and decline both invalidate any earlier
            // confirmations; they only make sense against the current
            // assignment.
            reset_confirmations: matches!(
                target,
                InterviewStatus::InterviewerAssigned | InterviewStatus::Pending
            ),
            new_assignment: match &change {
                AssignmentChange::Create(a) => Some(a.clone()),
                _ => None,
            },
            decline_assignment,
        };
        let rescheduled = write.schedule.is_some();

        let applied = self
            .interviews
            .apply_transition(&request, &write)
            .await?
            .ok_or(AppError::ConcurrencyConflict)?;

        info!(
            "interview {} moved {} -> {} by {} ({})",
            request.id, from, target, actor.id, actor.role
        );

        let event = LifecycleEvent {
            request_id: request.id.clone(),
            from,
            to: target,
            actor_id: actor.id.clone(),
            actor_role: actor.role,
            rescheduled,
        };

        let (interviewer, previous) = match &change {
            AssignmentChange::Create(a) => (
                Some(a.interviewer_id.clone()),
                applied.superseded.as_ref().map(|s| s.interviewer_id.clone()),
            ),
            AssignmentChange::Decline => (None, None),
            AssignmentChange::None => (active.map(|a| a.interviewer_id), None),
        };

        self.dispatcher
            .dispatch(&event, &applied.request, interviewer.as_deref(), previous.as_deref())
            .await;

        Ok(applied.request)
    }
}
