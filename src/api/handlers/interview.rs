use axum::{extract::{State, Path}, response::IntoResponse, Json, http::StatusCode};
use crate::state::AppState;
use crate::api::extractors::auth::AuthUser;
use crate::api::dtos::requests::{CreateInterviewRequest, UpdateInterviewRequest, UpdateStatusRequest};
use crate::domain::models::interview::{InterviewRequest, InterviewType, NewInterviewParams};
use crate::domain::models::status::{permitted_targets, InterviewStatus, Role, TransitionAuthority};
use crate::domain::services::lifecycle::TransitionOptions;
use crate::error::AppError;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::info;

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date, expected YYYY-MM-DD".into()))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| AppError::Validation("Invalid time, expected HH:MM".into()))
}

fn parse_type(raw: &str) -> Result<InterviewType, AppError> {
    InterviewType::parse(raw)
        .ok_or_else(|| AppError::Validation(format!("Unknown interview type: {raw}")))
}

pub async fn create_interview(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Json(payload): Json<CreateInterviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    if actor.role != Role::Candidate {
        return Err(AppError::NotAuthorized);
    }

    let params = NewInterviewParams {
        interview_type: parse_type(&payload.interview_type)?,
        scheduled_date: parse_date(&payload.date)?,
        scheduled_time: parse_time(&payload.time)?,
        additional_info: payload.additional_info,
    };

    let request = InterviewRequest::new(actor.id, params);
    let created = state.interview_repo.create(&request).await?;

    info!("Created interview request {}", created.id);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_interviews(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let interviews = match actor.role {
        Role::Admin => state.interview_repo.list_all().await?,
        Role::Candidate => state.interview_repo.list_by_candidate(&actor.id).await?,
        Role::Interviewer => state.interview_repo.list_assigned_to(&actor.id).await?,
    };

    Ok(Json(interviews))
}

pub async fn get_interview(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let interview = state.interview_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Interview not found".into()))?;
    let assignment = state.assignment_repo.find_active(&interview.id).await?;

    let visible = actor.role == Role::Admin
        || interview.candidate_id == actor.id
        || assignment.as_ref().is_some_and(|a| a.interviewer_id == actor.id);
    if !visible {
        return Err(AppError::NotAuthorized);
    }

    Ok(Json(serde_json::json!({
        "interview": interview,
        "assignment": assignment,
    })))
}

pub async fn update_interview(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInterviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    let interview = state.interview_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Interview not found".into()))?;

    if actor.role != Role::Candidate || interview.candidate_id != actor.id {
        return Err(AppError::NotAuthorized);
    }

    let mut to_update = interview.clone();
    if let Some(raw) = payload.interview_type {
        to_update.interview_type = parse_type(&raw)?.as_str().to_string();
    }
    if let Some(raw) = payload.date {
        to_update.scheduled_date = parse_date(&raw)?;
    }
    if let Some(raw) = payload.time {
        to_update.scheduled_time = parse_time(&raw)?;
    }
    if let Some(info_text) = payload.additional_info {
        to_update.additional_info = Some(info_text);
    }

    let updated = state.interview_repo.update_pending_details(&to_update).await?
        .ok_or(AppError::Conflict("Only pending requests can be edited".into()))?;

    info!("Candidate edited interview request {}", updated.id);

    Ok(Json(updated))
}

pub async fn delete_interview(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let interview = state.interview_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Interview not found".into()))?;

    let allowed = actor.role == Role::Admin
        || (actor.role == Role::Candidate && interview.candidate_id == actor.id);
    if !allowed {
        return Err(AppError::NotAuthorized);
    }

    state.interview_repo.delete(&interview.id).await?;
    info!("Deleted interview request {}", interview.id);

    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

/// Target statuses the caller may transition this request to, derived
/// from the transition table rather than re-implemented per client.
pub async fn permitted_actions(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let interview = state.interview_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Interview not found".into()))?;
    let assignment = state.assignment_repo.find_active(&interview.id).await?;

    let mut held: Vec<TransitionAuthority> = Vec::new();
    match actor.role {
        Role::Admin => held.push(TransitionAuthority::Admin),
        Role::Candidate if interview.candidate_id == actor.id => {
            held.push(TransitionAuthority::OwningCandidate);
        }
        Role::Interviewer
            if assignment.as_ref().is_some_and(|a| a.interviewer_id == actor.id) =>
        {
            held.push(TransitionAuthority::AssignedInterviewer);
        }
        _ => {}
    }

    let from = interview.current_status().ok_or(AppError::Internal)?;
    let actions = permitted_targets(from, &held);

    Ok(Json(serde_json::json!({
        "status": from,
        "actions": actions,
    })))
}

/// The lifecycle controller surface. Transitions with structural side
/// effects are routed to their dedicated operations so the table can
/// never be satisfied without the matching assignment bookkeeping.
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    AuthUser(actor): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reschedule = match (&payload.date, &payload.time) {
        (Some(date), Some(time)) => Some((parse_date(date)?, parse_time(time)?)),
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "date and time must be provided together".into(),
            ));
        }
    };

    let updated = match payload.status {
        InterviewStatus::CandidateConfirmed => {
            state.confirmation.confirm_as_candidate(&id, &actor).await?
        }
        InterviewStatus::InterviewerConfirmed => {
            state.confirmation.confirm_as_interviewer(&id, &actor).await?
        }
        InterviewStatus::Pending => {
            state.assignment_engine.decline_assignment(&id, &actor).await?
        }
        target => {
            let options = TransitionOptions {
                reschedule,
                meeting_url: payload.meeting_url,
            };
            state.lifecycle.transition(&id, target, &actor, options).await?
        }
    };

    Ok(Json(updated))
}
