use crate::domain::errors::DomainError;
use crate::domain::models::exam::ExamResult;
use async_trait::async_trait;

#[async_trait]
pub trait ExamResultRepository: Send + Sync {
    async fn save(&self, result: &ExamResult) -> Result<(), DomainError>;
    async fn find_all(&self) -> Result<Vec<ExamResult>, DomainError>;
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ExamResult>, DomainError>;
    /// Deletes every result owned by one of `user_ids`, returning the count removed.
    async fn delete_by_user_ids(&self, user_ids: &[String]) -> Result<usize, DomainError>;
}
