use std::sync::Arc;
use crate::domain::ports::{
    AssignmentRepository, AuthRepository, AvailabilityRepository, InterviewRepository,
    NotificationChannel, NotificationRepository, UserRepository,
};
use crate::domain::services::assignment::AssignmentEngine;
use crate::domain::services::auth_service::AuthService;
use crate::domain::services::confirmation::ConfirmationCoordinator;
use crate::domain::services::dispatcher::NotificationDispatcher;
use crate::domain::services::lifecycle::LifecycleController;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub interview_repo: Arc<dyn InterviewRepository>,
    pub assignment_repo: Arc<dyn AssignmentRepository>,
    pub availability_repo: Arc<dyn AvailabilityRepository>,
    pub auth_repo: Arc<dyn AuthRepository>,
    pub notification_repo: Arc<dyn NotificationRepository>,
    pub notification_channel: Arc<dyn NotificationChannel>,
    pub auth_service: Arc<AuthService>,
    pub dispatcher: Arc<NotificationDispatcher>,
    pub lifecycle: Arc<LifecycleController>,
    pub assignment_engine: Arc<AssignmentEngine>,
    pub confirmation: Arc<ConfirmationCoordinator>,
}
