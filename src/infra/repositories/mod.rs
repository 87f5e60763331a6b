pub mod postgres_assignment_repo;
pub mod postgres_auth_repo;
pub mod postgres_availability_repo;
pub mod postgres_interview_repo;
pub mod postgres_notification_repo;
pub mod postgres_user_repo;
pub mod sqlite_assignment_repo;
pub mod sqlite_auth_repo;
pub mod sqlite_availability_repo;
pub mod sqlite_interview_repo;
pub mod sqlite_notification_repo;
pub mod sqlite_user_repo;
