use crate::domain::errors::DomainError;
use crate::domain::models::question::Question;
use async_trait::async_trait;

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn save(&self, question: &Question) -> Result<(), DomainError>;
    async fn save_many(&self, questions: &[Question]) -> Result<(), DomainError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Question>, DomainError>;
    async fn find_all(&self) -> Result<Vec<Question>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    /// Removes every question and returns how many were deleted.
    async fn delete_all(&self) -> Result<usize, DomainError>;
}
