//! In-memory repositories shared by the service tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::services::audit_service::AuditService;
use crate::domain::errors::DomainError;
use crate::domain::models::audit::AuditLog;
use crate::domain::models::exam::ExamResult;
use crate::domain::models::profile::{InstructorProfile, StudentProfile};
use crate::domain::models::question::Question;
use crate::domain::models::settings::ExamSettings;
use crate::domain::models::user::{Role, User};
use crate::domain::repositories::audit_log_repository::AuditLogRepository;
use crate::domain::repositories::exam_result_repository::ExamResultRepository;
use crate::domain::repositories::profile_repository::ProfileRepository;
use crate::domain::repositories::question_repository::QuestionRepository;
use crate::domain::repositories::settings_repository::SettingsRepository;
use crate::domain::repositories::user_repository::UserRepository;
use crate::infrastructure::security::password::PasswordHasher;

pub fn fast_hasher() -> PasswordHasher {
    PasswordHasher::new(4)
}

pub fn user_with_password(email: &str, password: &str, role: Role) -> User {
    let hash = bcrypt::hash(password, 4).unwrap();
    User::new(email.to_string(), hash, role)
}

#[derive(Default)]
pub struct MockUserRepository {
    users: Mutex<HashMap<String, User>>,
}

impl MockUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        let repository = Self::default();
        {
            let mut map = repository.users.lock().unwrap();
            for user in users {
                map.insert(user.id.clone(), user);
            }
        }
        repository
    }
}

#[async_trait]
impl UserRepository for MockUserRepository {
    async fn save(&self, user: &User) -> Result<(), DomainError> {
        self.users
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<User, DomainError> {
        self.users
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email_matches(email))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        self.users
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        self.save(user).await
    }
}

/// A user store whose backing files cannot be read.
pub struct UnreadableUserRepository;

impl UnreadableUserRepository {
    fn failure() -> DomainError {
        DomainError::Internal("Failed to read file: permission denied".to_string())
    }
}

#[async_trait]
impl UserRepository for UnreadableUserRepository {
    async fn save(&self, _user: &User) -> Result<(), DomainError> {
        Err(Self::failure())
    }

    async fn find_by_id(&self, _id: &str) -> Result<User, DomainError> {
        Err(Self::failure())
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<User>, DomainError> {
        Err(Self::failure())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        Err(Self::failure())
    }

    async fn delete(&self, _id: &str) -> Result<(), DomainError> {
        Err(Self::failure())
    }

    async fn update(&self, _user: &User) -> Result<(), DomainError> {
        Err(Self::failure())
    }
}

#[derive(Default)]
pub struct MockProfileRepository {
    students: Mutex<HashMap<String, StudentProfile>>,
    instructors: Mutex<HashMap<String, InstructorProfile>>,
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn save_student(&self, profile: &StudentProfile) -> Result<(), DomainError> {
        self.students
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn find_student(&self, user_id: &str) -> Result<Option<StudentProfile>, DomainError> {
        Ok(self.students.lock().unwrap().get(user_id).cloned())
    }

    async fn find_all_students(&self) -> Result<Vec<StudentProfile>, DomainError> {
        Ok(self.students.lock().unwrap().values().cloned().collect())
    }

    async fn delete_student(&self, user_id: &str) -> Result<(), DomainError> {
        self.students.lock().unwrap().remove(user_id);
        Ok(())
    }

    async fn save_instructor(&self, profile: &InstructorProfile) -> Result<(), DomainError> {
        self.instructors
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn find_instructor(
        &self,
        user_id: &str,
    ) -> Result<Option<InstructorProfile>, DomainError> {
        Ok(self.instructors.lock().unwrap().get(user_id).cloned())
    }

    async fn delete_instructor(&self, user_id: &str) -> Result<(), DomainError> {
        self.instructors.lock().unwrap().remove(user_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MockQuestionRepository {
    questions: Mutex<Vec<Question>>,
}

#[async_trait]
impl QuestionRepository for MockQuestionRepository {
    async fn save(&self, question: &Question) -> Result<(), DomainError> {
        self.questions.lock().unwrap().push(question.clone());
        Ok(())
    }

    async fn save_many(&self, questions: &[Question]) -> Result<(), DomainError> {
        self.questions.lock().unwrap().extend_from_slice(questions);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Question>, DomainError> {
        Ok(self
            .questions
            .lock()
            .unwrap()
            .iter()
            .find(|question| question.id == id)
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Question>, DomainError> {
        Ok(self.questions.lock().unwrap().clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.questions.lock().unwrap().len())
    }

    async fn delete_all(&self) -> Result<usize, DomainError> {
        let mut questions = self.questions.lock().unwrap();
        let deleted = questions.len();
        questions.clear();
        Ok(deleted)
    }
}

#[derive(Default)]
pub struct MockExamResultRepository {
    results: Mutex<Vec<ExamResult>>,
}

#[async_trait]
impl ExamResultRepository for MockExamResultRepository {
    async fn save(&self, result: &ExamResult) -> Result<(), DomainError> {
        self.results.lock().unwrap().push(result.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<ExamResult>, DomainError> {
        let mut results = self.results.lock().unwrap().clone();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(results)
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<ExamResult>, DomainError> {
        let results = self.find_all().await?;
        Ok(results
            .into_iter()
            .filter(|result| result.user_id == user_id)
            .collect())
    }

    async fn delete_by_user_ids(&self, user_ids: &[String]) -> Result<usize, DomainError> {
        let mut results = self.results.lock().unwrap();
        let before = results.len();
        results.retain(|result| !user_ids.contains(&result.user_id));
        Ok(before - results.len())
    }
}

#[derive(Default)]
pub struct MockSettingsRepository {
    settings: Mutex<Option<ExamSettings>>,
}

#[async_trait]
impl SettingsRepository for MockSettingsRepository {
    async fn save(&self, settings: &ExamSettings) -> Result<(), DomainError> {
        *self.settings.lock().unwrap() = Some(settings.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<ExamSettings>, DomainError> {
        Ok(self.settings.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MockAuditLogRepository {
    logs: Mutex<Vec<AuditLog>>,
    pub fail_writes: bool,
}

impl MockAuditLogRepository {
    pub fn failing() -> Self {
        Self {
            logs: Mutex::new(Vec::new()),
            fail_writes: true,
        }
    }

    pub fn actions(&self) -> Vec<String> {
        self.logs
            .lock()
            .unwrap()
            .iter()
            .map(|log| log.action.clone())
            .collect()
    }
}

#[async_trait]
impl AuditLogRepository for MockAuditLogRepository {
    async fn append(&self, entry: &AuditLog) -> Result<(), DomainError> {
        if self.fail_writes {
            return Err(DomainError::Internal("disk full".to_string()));
        }
        self.logs.lock().unwrap().push(entry.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<AuditLog>, DomainError> {
        let mut logs = self.logs.lock().unwrap().clone();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }

    async fn delete_by_user(&self, user_id: &str) -> Result<usize, DomainError> {
        let mut logs = self.logs.lock().unwrap();
        let before = logs.len();
        logs.retain(|log| log.user_id.as_deref() != Some(user_id));
        Ok(before - logs.len())
    }
}

pub fn audit_service(repository: &Arc<MockAuditLogRepository>) -> Arc<AuditService> {
    Arc::new(AuditService::new(repository.clone()))
}
