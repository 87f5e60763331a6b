use serde::Deserialize;

use crate::domain::models::status::InterviewStatus;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct CreateInterviewRequest {
    pub interview_type: String,
    pub date: String,
    pub time: String,
    pub additional_info: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateInterviewRequest {
    pub interview_type: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub additional_info: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: InterviewStatus,
    pub date: Option<String>,
    pub time: Option<String>,
    pub meeting_url: Option<String>,
}

#[derive(Deserialize)]
pub struct AssignInterviewerRequest {
    pub interviewer_id: String,
}

#[derive(Deserialize)]
pub struct NotificationListQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct UserListQuery {
    pub role: Option<String>,
}
