use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::domain::models::question::Question;
use crate::domain::repositories::question_repository::QuestionRepository;
use crate::infrastructure::persistence::record_store::{JsonRecordStore, StoredRecord};

impl StoredRecord for Question {
    fn record_key(&self) -> &str {
        &self.id
    }
}

pub struct FileQuestionRepository {
    store: JsonRecordStore<Question>,
}

impl FileQuestionRepository {
    pub fn new(questions_dir: PathBuf) -> Self {
        Self {
            store: JsonRecordStore::new(questions_dir),
        }
    }
}

#[async_trait]
impl QuestionRepository for FileQuestionRepository {
    async fn save(&self, question: &Question) -> Result<(), DomainError> {
        self.store.put(question).await
    }

    async fn save_many(&self, questions: &[Question]) -> Result<(), DomainError> {
        tracing::debug!("Saving {} questions", questions.len());
        self.store.put_many(questions).await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Question>, DomainError> {
        self.store.get(id).await
    }

    async fn find_all(&self) -> Result<Vec<Question>, DomainError> {
        let mut questions = self.store.all().await?;
        questions.sort_by(|a, b| {
            (a.exam_type.as_str(), a.subject.as_str(), a.id.as_str()).cmp(&(
                b.exam_type.as_str(),
                b.subject.as_str(),
                b.id.as_str(),
            ))
        });
        Ok(questions)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.store.len().await
    }

    async fn delete_all(&self) -> Result<usize, DomainError> {
        self.store.remove_where(|_| true).await
    }
}
