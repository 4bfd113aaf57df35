use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::domain::models::exam::ExamResult;
use crate::domain::repositories::exam_result_repository::ExamResultRepository;
use crate::infrastructure::persistence::record_store::{JsonRecordStore, StoredRecord};

impl StoredRecord for ExamResult {
    fn record_key(&self) -> &str {
        &self.id
    }
}

pub struct FileExamResultRepository {
    store: JsonRecordStore<ExamResult>,
}

impl FileExamResultRepository {
    pub fn new(results_dir: PathBuf) -> Self {
        Self {
            store: JsonRecordStore::new(results_dir),
        }
    }
}

fn newest_first(mut results: Vec<ExamResult>) -> Vec<ExamResult> {
    results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    results
}

#[async_trait]
impl ExamResultRepository for FileExamResultRepository {
    async fn save(&self, result: &ExamResult) -> Result<(), DomainError> {
        self.store.put(result).await
    }

    async fn find_all(&self) -> Result<Vec<ExamResult>, DomainError> {
        Ok(newest_first(self.store.all().await?))
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ExamResult>, DomainError> {
        Ok(newest_first(
            self.store.filter(|result| result.user_id == user_id).await?,
        ))
    }

    async fn delete_by_user_ids(&self, user_ids: &[String]) -> Result<usize, DomainError> {
        if user_ids.is_empty() {
            return Ok(0);
        }
        self.store
            .remove_where(|result| user_ids.contains(&result.user_id))
            .await
    }
}
