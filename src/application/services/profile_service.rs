use std::sync::Arc;

use chrono::Utc;

use crate::application::dto::profile_dto::{InstructorProfileDto, StudentProfileDto};
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::domain::models::audit::{ACTION_INSTRUCTOR_PROFILE_SAVE, ACTION_PROFILE_SAVE};
use crate::domain::models::licensure::{LET_SECONDARY_MAJORS, LetTrack, Licensure};
use crate::domain::models::profile::{InstructorProfile, StudentProfile};
use crate::domain::models::user::User;
use crate::domain::repositories::profile_repository::ProfileRepository;

const ELEMENTARY_MAJOR: &str = "Elementary";

fn invalid(message: impl Into<String>) -> ApplicationError {
    ApplicationError::BadInput(message.into())
}

pub struct ProfileService {
    profile_repository: Arc<dyn ProfileRepository>,
    audit_service: Arc<AuditService>,
}

impl ProfileService {
    pub fn new(
        profile_repository: Arc<dyn ProfileRepository>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self {
            profile_repository,
            audit_service,
        }
    }

    pub async fn get_student_profile(
        &self,
        user: &User,
    ) -> Result<Option<StudentProfileDto>, ApplicationError> {
        tracing::debug!("Getting student profile for {}", user.id);

        let profile = self.profile_repository.find_student(&user.id).await?;
        Ok(profile.map(StudentProfileDto::from))
    }

    pub async fn save_student_profile(
        &self,
        user: &User,
        mut dto: StudentProfileDto,
    ) -> Result<StudentProfileDto, ApplicationError> {
        tracing::info!("Saving student profile for {}", user.id);

        if !user.email_matches(&dto.email_address) {
            return Err(invalid("Email must match account email"));
        }

        let licensure = Licensure::parse(&dto.target_licensure)
            .ok_or_else(|| invalid("Invalid target licensure"))?;
        let rule = licensure.rule();

        let let_track = if licensure == Licensure::Let {
            let track = dto
                .let_track
                .as_deref()
                .and_then(LetTrack::parse)
                .ok_or_else(|| invalid("LET track is required"))?;
            match track {
                LetTrack::Secondary => {
                    if !LET_SECONDARY_MAJORS.contains(&dto.major_specialization.as_str()) {
                        return Err(invalid("LET major is required for Secondary"));
                    }
                }
                LetTrack::Elementary => {
                    dto.major_specialization = ELEMENTARY_MAJOR.to_string();
                }
            }
            Some(track)
        } else {
            None
        };

        if dto.required_passing_threshold != rule.passing_threshold {
            return Err(invalid(format!(
                "Passing threshold must be {} for {}",
                rule.passing_threshold, licensure
            )));
        }

        if dto.assigned_review_subjects.is_empty() {
            return Err(invalid("Assigned review subjects are required"));
        }
        let allowed = licensure.allowed_subjects(let_track);
        if !dto
            .assigned_review_subjects
            .iter()
            .all(|subject| allowed.contains(&subject.as_str()))
        {
            return Err(invalid("Invalid review subjects for licensure"));
        }

        let others: Vec<StudentProfile> = self
            .profile_repository
            .find_all_students()
            .await?
            .into_iter()
            .filter(|profile| profile.user_id != user.id)
            .collect();
        if others
            .iter()
            .any(|profile| profile.student_id_number == dto.student_id_number)
        {
            return Err(invalid("Student ID already in use"));
        }
        if others.iter().any(|profile| profile.username == dto.username) {
            return Err(invalid("Username already in use"));
        }

        let profile = StudentProfile {
            user_id: user.id.clone(),
            student_id_number: dto.student_id_number,
            first_name: dto.first_name,
            middle_name: dto.middle_name,
            last_name: dto.last_name,
            email_address: dto.email_address,
            username: dto.username,
            program_degree: dto.program_degree,
            year_level: dto.year_level,
            section_class: dto.section_class,
            status: dto.status,
            target_licensure: licensure,
            let_track,
            major_specialization: dto.major_specialization,
            assigned_review_subjects: dto.assigned_review_subjects,
            required_passing_threshold: dto.required_passing_threshold,
            updated_at: Utc::now(),
        };

        self.profile_repository.save_student(&profile).await?;
        self.audit_service
            .log(Some(&user.id), ACTION_PROFILE_SAVE, "Student profile saved")
            .await;

        Ok(StudentProfileDto::from(profile))
    }

    pub async fn get_instructor_profile(
        &self,
        user: &User,
    ) -> Result<Option<InstructorProfileDto>, ApplicationError> {
        ensure_staff(user)?;

        let profile = self.profile_repository.find_instructor(&user.id).await?;
        Ok(profile.map(InstructorProfileDto::from))
    }

    pub async fn save_instructor_profile(
        &self,
        user: &User,
        dto: InstructorProfileDto,
    ) -> Result<InstructorProfileDto, ApplicationError> {
        ensure_staff(user)?;
        tracing::info!("Saving instructor profile for {}", user.id);

        for (field, value) in [
            ("employee_id", &dto.employee_id),
            ("name", &dto.name),
            ("department", &dto.department),
            ("position", &dto.position),
            ("program", &dto.program),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(format!("{} is required", field)));
            }
        }

        let profile = InstructorProfile {
            user_id: user.id.clone(),
            employee_id: dto.employee_id.trim().to_string(),
            name: dto.name.trim().to_string(),
            department: dto.department.trim().to_string(),
            position: dto.position.trim().to_string(),
            program: dto.program.trim().to_string(),
            updated_at: Utc::now(),
        };

        self.profile_repository.save_instructor(&profile).await?;
        self.audit_service
            .log(
                Some(&user.id),
                ACTION_INSTRUCTOR_PROFILE_SAVE,
                "Instructor profile saved",
            )
            .await;

        Ok(InstructorProfileDto::from(profile))
    }
}

fn ensure_staff(user: &User) -> Result<(), ApplicationError> {
    if user.role.is_staff() {
        Ok(())
    } else {
        Err(ApplicationError::not_authorized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::test_support::{
        MockAuditLogRepository, MockProfileRepository, audit_service,
    };
    use crate::domain::models::user::Role;

    fn service() -> (ProfileService, Arc<MockAuditLogRepository>) {
        let audit = Arc::new(MockAuditLogRepository::default());
        let service = ProfileService::new(
            Arc::new(MockProfileRepository::default()),
            audit_service(&audit),
        );
        (service, audit)
    }

    fn student(email: &str) -> User {
        User::new(email.to_string(), "hash".to_string(), Role::Student)
    }

    fn let_profile(email: &str) -> StudentProfileDto {
        StudentProfileDto {
            student_id_number: "2024-0001".to_string(),
            first_name: "Ana".to_string(),
            middle_name: "".to_string(),
            last_name: "Reyes".to_string(),
            email_address: email.to_string(),
            username: "ana".to_string(),
            program_degree: "BSEd".to_string(),
            year_level: "4".to_string(),
            section_class: None,
            status: "Regular".to_string(),
            target_licensure: "LET".to_string(),
            let_track: Some("Secondary".to_string()),
            major_specialization: "Mathematics".to_string(),
            assigned_review_subjects: vec!["GenEd".to_string(), "Specialization".to_string()],
            required_passing_threshold: 75,
        }
    }

    #[tokio::test]
    async fn saves_and_reads_back_a_valid_profile() {
        let (service, audit) = service();
        let user = student("ana@example.com");

        assert!(service.get_student_profile(&user).await.unwrap().is_none());

        let saved = service
            .save_student_profile(&user, let_profile("ANA@example.com"))
            .await
            .unwrap();
        assert_eq!(saved.let_track.as_deref(), Some("Secondary"));

        let loaded = service.get_student_profile(&user).await.unwrap().unwrap();
        assert_eq!(loaded.username, "ana");
        assert_eq!(audit.actions(), vec![ACTION_PROFILE_SAVE.to_string()]);
    }

    #[tokio::test]
    async fn validation_messages_follow_rule_order() {
        let (service, _) = service();
        let user = student("ana@example.com");

        let dto = let_profile("other@example.com");
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Email must match account email");

        let mut dto = let_profile("ana@example.com");
        dto.target_licensure = "Bar".to_string();
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Invalid target licensure");

        let mut dto = let_profile("ana@example.com");
        dto.let_track = None;
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "LET track is required");

        let mut dto = let_profile("ana@example.com");
        dto.major_specialization = "Music".to_string();
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "LET major is required for Secondary");

        let mut dto = let_profile("ana@example.com");
        dto.required_passing_threshold = 60;
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Passing threshold must be 75 for LET");

        let mut dto = let_profile("ana@example.com");
        dto.assigned_review_subjects.clear();
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Assigned review subjects are required");

        let mut dto = let_profile("ana@example.com");
        dto.let_track = Some("Elementary".to_string());
        let error = service.save_student_profile(&user, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Invalid review subjects for licensure");
    }

    #[tokio::test]
    async fn elementary_forces_major_and_non_let_clears_track() {
        let (service, _) = service();
        let user = student("ana@example.com");

        let mut dto = let_profile("ana@example.com");
        dto.let_track = Some("Elementary".to_string());
        dto.major_specialization = "".to_string();
        dto.assigned_review_subjects = vec!["GenEd".to_string(), "ProfEd".to_string()];
        let saved = service.save_student_profile(&user, dto).await.unwrap();
        assert_eq!(saved.major_specialization, "Elementary");

        let mut dto = let_profile("ana@example.com");
        dto.target_licensure = "CPA".to_string();
        dto.assigned_review_subjects = vec!["FAR".to_string(), "Taxation".to_string()];
        let saved = service.save_student_profile(&user, dto).await.unwrap();
        assert!(saved.let_track.is_none());
    }

    #[tokio::test]
    async fn student_id_and_username_must_be_unique() {
        let (service, _) = service();
        let ana = student("ana@example.com");
        let ben = student("ben@example.com");
        service
            .save_student_profile(&ana, let_profile("ana@example.com"))
            .await
            .unwrap();

        let mut dto = let_profile("ben@example.com");
        dto.username = "ben".to_string();
        let error = service.save_student_profile(&ben, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Student ID already in use");

        let mut dto = let_profile("ben@example.com");
        dto.student_id_number = "2024-0002".to_string();
        let error = service.save_student_profile(&ben, dto).await.unwrap_err();
        assert_eq!(error.detail(), "Username already in use");

        // Re-saving one's own profile is not a conflict.
        assert!(
            service
                .save_student_profile(&ana, let_profile("ana@example.com"))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn instructor_profiles_are_staff_only() {
        let (service, audit) = service();
        let dto = InstructorProfileDto {
            employee_id: "E-1".to_string(),
            name: "Dr. Cruz".to_string(),
            department: "Education".to_string(),
            position: "Professor".to_string(),
            program: "BSEd".to_string(),
        };

        let error = service
            .save_instructor_profile(&student("s@example.com"), dto.clone())
            .await
            .unwrap_err();
        assert_eq!(error.detail(), "Not authorized");

        let instructor = User::new("i@example.com".to_string(), "h".to_string(), Role::Instructor);
        let mut blank = dto.clone();
        blank.department = "  ".to_string();
        let error = service
            .save_instructor_profile(&instructor, blank)
            .await
            .unwrap_err();
        assert_eq!(error.detail(), "department is required");

        service.save_instructor_profile(&instructor, dto).await.unwrap();
        let loaded = service.get_instructor_profile(&instructor).await.unwrap();
        assert_eq!(loaded.map(|p| p.employee_id).as_deref(), Some("E-1"));
        assert_eq!(audit.actions(), vec![ACTION_INSTRUCTOR_PROFILE_SAVE.to_string()]);
    }
}
