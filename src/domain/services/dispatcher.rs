use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use crate::domain::models::interview::InterviewRequest;
use crate::domain::models::notification::Notification;
use crate::domain::models::status::{InterviewStatus, Role};
use crate::domain::ports::{NotificationChannel, NotificationRepository, UserRepository};

/// Emitted once per successful status transition, after the write is
/// durably committed.
#[derive(Debug, Clone)]
pub struct LifecycleEvent {
    pub request_id: String,
    pub from: InterviewStatus,
    pub to: InterviewStatus,
    pub actor_id: String,
    pub actor_role: Role,
    /// The transition also moved the slot to a new date/time.
    pub rescheduled: bool,
}

pub const KIND_STATUS: &str = "INTERVIEW_STATUS";
pub const KIND_ASSIGNED: &str = "INTERVIEW_ASSIGNED";
pub const KIND_REASSIGNED: &str = "INTERVIEW_REASSIGNED";
pub const KIND_ADMIN_ATTENTION: &str = "ADMIN_ATTENTION";

/// Fans lifecycle events out to the interested parties: the candidate
/// always, the assigned interviewer when one exists, admins when a request
/// needs their attention again. Every failure is logged and swallowed;
/// delivery can never roll back a committed transition.
pub struct NotificationDispatcher {
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
    channel: Arc<dyn NotificationChannel>,
}

impl NotificationDispatcher {
    pub fn new(
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationRepository>,
        channel: Arc<dyn NotificationChannel>,
    ) -> Self {
        Self { users, notifications, channel }
    }

    pub async fn dispatch(
        &self,
        event: &LifecycleEvent,
        request: &InterviewRequest,
        interviewer_id: Option<&str>,
        previous_interviewer_id: Option<&str>,
    ) {
        let mut targets: Vec<(String, &'static str, String)> = Vec::new();

        targets.push((
            request.candidate_id.clone(),
            KIND_STATUS,
            candidate_headline(event),
        ));

        if let Some(interviewer) = interviewer_id {
            let (kind, title) = if event.to == InterviewStatus::InterviewerAssigned {
                (KIND_ASSIGNED, "You have been assigned a new interview".to_string())
            } else {
                (KIND_STATUS, interviewer_headline(event))
            };
            targets.push((interviewer.to_string(), kind, title));
        }

        if let Some(previous) = previous_interviewer_id {
            targets.push((
                previous.to_string(),
                KIND_REASSIGNED,
                "An interview you were assigned to was given to another interviewer".to_string(),
            ));
        }

        if needs_admin_attention(event) {
            match self.users.list(Some(Role::Admin)).await {
                Ok(admins) => {
                    for admin in admins {
                        targets.push((admin.id, KIND_ADMIN_ATTENTION, admin_headline(event)));
                    }
                }
                Err(e) => warn!("could not resolve admin recipients: {e}"),
            }
        }

        let body = Some(format!(
            "{} interview on {} at {}",
            request.interview_type,
            request.scheduled_date.format("%Y-%m-%d"),
            request.scheduled_time.format("%H:%M"),
        ));

        let mut seen: HashSet<String> = HashSet::new();
        for (user_id, kind, title) in targets {
            if !seen.insert(user_id.clone()) {
                continue;
            }

            let notification = Notification::new(
                user_id,
                kind,
                title,
                body.clone(),
                Some(request.id.clone()),
            );

            if let Err(e) = self.notifications.create(&notification).await {
                warn!("failed to record notification for {}: {e}", notification.user_id);
                continue;
            }
            if let Err(e) = self.channel.publish(&notification.user_id, &notification).await {
                warn!("failed to publish notification for {}: {e}", notification.user_id);
            }
        }
    }
}

/// Admins hear about requests entering REJECTED/CANCELLED and about
/// declines that drop a request back into the unassigned pool; nothing is
/// reassigned automatically.
fn needs_admin_attention(event: &LifecycleEvent) -> bool {
    matches!(event.to, InterviewStatus::Rejected | InterviewStatus::Cancelled)
        || (event.to == InterviewStatus::Pending && event.actor_role != Role::Admin)
}

fn candidate_headline(event: &LifecycleEvent) -> String {
    let base = match event.to {
        InterviewStatus::Pending => "Your interview is waiting for a new interviewer",
        InterviewStatus::InterviewerAssigned => "An interviewer has been assigned to your interview",
        InterviewStatus::CandidateConfirmed => "Your confirmation was recorded",
        InterviewStatus::InterviewerConfirmed => "Your interviewer has confirmed",
        InterviewStatus::Confirmed => "Your interview is confirmed",
        InterviewStatus::Completed => "Your interview was marked as completed",
        InterviewStatus::Rejected => "Your interview request was rejected",
        InterviewStatus::Cancelled => "Your interview was cancelled",
        InterviewStatus::Rescheduled => "Your interview was rescheduled",
    };

    if event.rescheduled {
        format!("{base} (rescheduled)")
    } else {
        base.to_string()
    }
}

fn interviewer_headline(event: &LifecycleEvent) -> String {
    let base = match event.to {
        InterviewStatus::CandidateConfirmed => "The candidate has confirmed the interview",
        InterviewStatus::InterviewerConfirmed => "Your confirmation was recorded",
        InterviewStatus::Confirmed => "The interview is confirmed",
        InterviewStatus::Completed => "The interview was marked as completed",
        InterviewStatus::Cancelled => "An interview you are assigned to was cancelled",
        InterviewStatus::Rejected => "An interview you were assigned to was rejected",
        _ => "An interview you are assigned to changed status",
    };

    if event.rescheduled {
        format!("{base} (rescheduled)")
    } else {
        base.to_string()
    }
}

fn admin_headline(event: &LifecycleEvent) -> String {
    match event.to {
        InterviewStatus::Pending => "An interviewer declined an assignment; the request needs a new one".to_string(),
        status => format!("An interview moved to {status}"),
    }
}
