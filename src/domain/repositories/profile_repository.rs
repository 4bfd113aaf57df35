use crate::domain::errors::DomainError;
use crate::domain::models::profile::{InstructorProfile, StudentProfile};
use async_trait::async_trait;

/// Storage for per-user profiles, keyed by the owning user id.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn save_student(&self, profile: &StudentProfile) -> Result<(), DomainError>;
    async fn find_student(&self, user_id: &str) -> Result<Option<StudentProfile>, DomainError>;
    async fn find_all_students(&self) -> Result<Vec<StudentProfile>, DomainError>;
    async fn delete_student(&self, user_id: &str) -> Result<(), DomainError>;

    async fn save_instructor(&self, profile: &InstructorProfile) -> Result<(), DomainError>;
    async fn find_instructor(&self, user_id: &str)
    -> Result<Option<InstructorProfile>, DomainError>;
    async fn delete_instructor(&self, user_id: &str) -> Result<(), DomainError>;
}
