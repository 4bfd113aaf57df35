use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::models::audit::AuditLog;
use crate::domain::repositories::audit_log_repository::AuditLogRepository;
use crate::infrastructure::persistence::jsonl_utils::{
    append_jsonl_line, read_jsonl_file, write_jsonl_file,
};

/// Append-only audit trail stored as JSON lines, oldest first on disk.
pub struct FileAuditLogRepository {
    log_file: PathBuf,
    write_lock: Mutex<()>,
}

impl FileAuditLogRepository {
    pub fn new(log_file: PathBuf) -> Self {
        Self {
            log_file,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl AuditLogRepository for FileAuditLogRepository {
    async fn append(&self, entry: &AuditLog) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        append_jsonl_line(&self.log_file, entry).await
    }

    async fn find_all(&self) -> Result<Vec<AuditLog>, DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut entries: Vec<AuditLog> = read_jsonl_file(&self.log_file).await?;
        // Stable sort keeps append order for entries sharing a timestamp.
        entries.reverse();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<usize, DomainError> {
        let _guard = self.write_lock.lock().await;
        let entries: Vec<AuditLog> = read_jsonl_file(&self.log_file).await?;
        let before = entries.len();
        let kept: Vec<AuditLog> = entries
            .into_iter()
            .filter(|entry| entry.user_id.as_deref() != Some(user_id))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            write_jsonl_file(&self.log_file, &kept).await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rand::random;

    #[tokio::test]
    async fn entries_come_back_newest_first_and_delete_by_user() {
        let root = std::env::temp_dir().join(format!("reviewer-audit-{}", random::<u64>()));
        let repository = FileAuditLogRepository::new(root.join("audit_logs.jsonl"));

        let mut older = AuditLog::new(Some("u1".to_string()), "login", "first");
        older.created_at = Utc::now() - Duration::minutes(5);
        let newer = AuditLog::new(Some("u2".to_string()), "login", "second");
        let system = AuditLog::new(None, "settings_update", "third");

        repository.append(&older).await.unwrap();
        repository.append(&newer).await.unwrap();
        repository.append(&system).await.unwrap();

        let entries = repository.find_all().await.unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].detail, "first");

        assert_eq!(repository.delete_by_user("u1").await.unwrap(), 1);
        assert_eq!(repository.delete_by_user("u1").await.unwrap(), 0);
        assert_eq!(repository.find_all().await.unwrap().len(), 2);

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
