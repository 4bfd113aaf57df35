use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::errors::DomainError;
use crate::domain::models::profile::{InstructorProfile, StudentProfile};
use crate::domain::repositories::profile_repository::ProfileRepository;
use crate::infrastructure::persistence::record_store::{JsonRecordStore, StoredRecord};

impl StoredRecord for StudentProfile {
    fn record_key(&self) -> &str {
        &self.user_id
    }
}

impl StoredRecord for InstructorProfile {
    fn record_key(&self) -> &str {
        &self.user_id
    }
}

/// Profiles are stored one file per owning user.
pub struct FileProfileRepository {
    students: JsonRecordStore<StudentProfile>,
    instructors: JsonRecordStore<InstructorProfile>,
}

impl FileProfileRepository {
    pub fn new(students_dir: PathBuf, instructors_dir: PathBuf) -> Self {
        Self {
            students: JsonRecordStore::new(students_dir),
            instructors: JsonRecordStore::new(instructors_dir),
        }
    }
}

#[async_trait]
impl ProfileRepository for FileProfileRepository {
    async fn save_student(&self, profile: &StudentProfile) -> Result<(), DomainError> {
        self.students.put(profile).await
    }

    async fn find_student(&self, user_id: &str) -> Result<Option<StudentProfile>, DomainError> {
        self.students.get(user_id).await
    }

    async fn find_all_students(&self) -> Result<Vec<StudentProfile>, DomainError> {
        self.students.all().await
    }

    async fn delete_student(&self, user_id: &str) -> Result<(), DomainError> {
        self.students.remove(user_id).await?;
        Ok(())
    }

    async fn save_instructor(&self, profile: &InstructorProfile) -> Result<(), DomainError> {
        self.instructors.put(profile).await
    }

    async fn find_instructor(
        &self,
        user_id: &str,
    ) -> Result<Option<InstructorProfile>, DomainError> {
        self.instructors.get(user_id).await
    }

    async fn delete_instructor(&self, user_id: &str) -> Result<(), DomainError> {
        self.instructors.remove(user_id).await?;
        Ok(())
    }
}
