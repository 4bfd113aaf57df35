use std::collections::HashMap;
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::application::dto::exam_dto::{
    ExamResultDto, ExamStatsDto, ExamSubmissionDto, ExamSubmissionResultDto,
};
use crate::application::dto::question_dto::ExamQuestionDto;
use crate::application::errors::ApplicationError;
use crate::application::services::audit_service::AuditService;
use crate::application::services::settings_service::SettingsService;
use crate::domain::models::audit::ACTION_EXAM_SUBMIT;
use crate::domain::models::exam::{ExamResult, grade_submission, round2};
use crate::domain::models::profile::StudentProfile;
use crate::domain::models::question::Question;
use crate::domain::models::user::{Role, User};
use crate::domain::repositories::exam_result_repository::ExamResultRepository;
use crate::domain::repositories::profile_repository::ProfileRepository;
use crate::domain::repositories::question_repository::QuestionRepository;
use crate::domain::repositories::user_repository::UserRepository;

/// Number of scores shown in the stats trend line.
const RECENT_SCORES: usize = 7;

pub struct ExamService {
    question_repository: Arc<dyn QuestionRepository>,
    exam_result_repository: Arc<dyn ExamResultRepository>,
    profile_repository: Arc<dyn ProfileRepository>,
    user_repository: Arc<dyn UserRepository>,
    settings_service: Arc<SettingsService>,
    audit_service: Arc<AuditService>,
}

impl ExamService {
    pub fn new(
        question_repository: Arc<dyn QuestionRepository>,
        exam_result_repository: Arc<dyn ExamResultRepository>,
        profile_repository: Arc<dyn ProfileRepository>,
        user_repository: Arc<dyn UserRepository>,
        settings_service: Arc<SettingsService>,
        audit_service: Arc<AuditService>,
    ) -> Self {
        Self {
            question_repository,
            exam_result_repository,
            profile_repository,
            user_repository,
            settings_service,
            audit_service,
        }
    }

    async fn require_profile(&self, user: &User) -> Result<StudentProfile, ApplicationError> {
        self.profile_repository
            .find_student(&user.id)
            .await?
            .ok_or_else(|| ApplicationError::BadInput("Profile not found".to_string()))
    }

    /// Draws a random exam for the candidate's licensure and review subjects.
    pub async fn start_exam(&self, user: &User) -> Result<Vec<ExamQuestionDto>, ApplicationError> {
        tracing::info!("Starting exam for {}", user.id);

        let profile = self.require_profile(user).await?;
        let exam_type = profile.target_licensure.as_str();
        let subjects = &profile.assigned_review_subjects;

        let mut pool: Vec<Question> = self
            .question_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|question| question.exam_type == exam_type)
            .filter(|question| subjects.is_empty() || subjects.contains(&question.subject))
            .collect();

        let requested = self.settings_service.get_or_create().await?.exam_question_count as usize;
        if pool.len() < requested {
            return Err(ApplicationError::BadInput(format!(
                "Not enough questions available for this track. Requested {}, but only {} available.",
                requested,
                pool.len()
            )));
        }

        pool.shuffle(&mut rand::rng());
        pool.truncate(requested);

        Ok(pool.into_iter().map(ExamQuestionDto::from).collect())
    }

    pub async fn submit_exam(
        &self,
        user: &User,
        dto: ExamSubmissionDto,
    ) -> Result<ExamSubmissionResultDto, ApplicationError> {
        tracing::info!("Submitting {} answers for {}", dto.answers.len(), user.id);

        let profile = self.require_profile(user).await?;
        let exam_type = profile.target_licensure.as_str().to_string();

        let mut questions = HashMap::new();
        for question_id in dto.answers.keys() {
            if let Some(question) = self.question_repository.find_by_id(question_id).await? {
                questions.insert(question_id.clone(), question);
            }
        }

        let grade = grade_submission(
            &dto.answers,
            &questions,
            &exam_type,
            profile.required_passing_threshold,
        );
        let result = ExamResult::from_grade(user.id.clone(), exam_type, grade);
        self.exam_result_repository.save(&result).await?;

        self.audit_service
            .log(
                Some(&user.id),
                ACTION_EXAM_SUBMIT,
                format!(
                    "Score {}/{} ({}%)",
                    result.score, result.total, result.percentage
                ),
            )
            .await;

        Ok(ExamSubmissionResultDto {
            email: user.email.clone(),
            exam_type: result.exam_type,
            score: result.score,
            total: result.total,
            percentage: result.percentage,
            result: result.result,
            subject_performance: result.subject_performance,
            incorrect_questions: result.incorrect_questions,
        })
    }

    /// The caller's own attempts, newest first.
    pub async fn list_results(&self, user: &User) -> Result<Vec<ExamResultDto>, ApplicationError> {
        tracing::debug!("Listing exam results for {}", user.id);

        let results = self.exam_result_repository.find_by_user(&user.id).await?;
        Ok(results.into_iter().map(ExamResultDto::from).collect())
    }

    pub async fn stats(&self) -> Result<ExamStatsDto, ApplicationError> {
        tracing::debug!("Computing exam stats");

        let results = self.exam_result_repository.find_all().await?;
        let attempts = results.len();
        let question_count = self.settings_service.get_or_create().await?.exam_question_count;

        let avg_score = if attempts == 0 {
            0.0
        } else {
            round2(results.iter().map(|r| r.percentage).sum::<f64>() / attempts as f64)
        };

        let total_answered: u64 = results.iter().map(|r| u64::from(r.total)).sum();
        let completion_rate = if attempts == 0 || question_count == 0 {
            0.0
        } else {
            let expected = attempts as f64 * f64::from(question_count);
            (total_answered as f64 / expected * 100.0)
                .round_ties_even()
                .min(100.0)
        };

        let active_students = self
            .user_repository
            .find_all()
            .await?
            .iter()
            .filter(|user| user.role == Role::Student)
            .count();

        let mut recent_scores: Vec<f64> = results
            .iter()
            .take(RECENT_SCORES)
            .map(|r| r.percentage)
            .collect();
        recent_scores.reverse();

        Ok(ExamStatsDto {
            avg_score,
            completion_rate,
            active_students,
            recent_scores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dto::admin_dto::ExamSettingsDto;
    use crate::application::services::test_support::{
        MockAuditLogRepository, MockExamResultRepository, MockProfileRepository,
        MockQuestionRepository, MockSettingsRepository, MockUserRepository, audit_service,
    };
    use crate::domain::models::exam::ExamOutcome;
    use crate::domain::models::licensure::{LetTrack, Licensure};
    use crate::domain::models::question::{AnswerOption, Difficulty, NewQuestion};
    use chrono::{Duration, Utc};
    use std::collections::{BTreeMap, HashSet};

    struct Fixture {
        service: ExamService,
        settings: Arc<SettingsService>,
        questions: Arc<MockQuestionRepository>,
        results: Arc<MockExamResultRepository>,
        profiles: Arc<MockProfileRepository>,
        audit: Arc<MockAuditLogRepository>,
    }

    fn fixture(users: Vec<User>) -> Fixture {
        let questions = Arc::new(MockQuestionRepository::default());
        let results = Arc::new(MockExamResultRepository::default());
        let profiles = Arc::new(MockProfileRepository::default());
        let audit = Arc::new(MockAuditLogRepository::default());
        let settings = Arc::new(SettingsService::new(
            Arc::new(MockSettingsRepository::default()),
            questions.clone(),
            audit_service(&audit),
        ));
        let service = ExamService::new(
            questions.clone(),
            results.clone(),
            profiles.clone(),
            Arc::new(MockUserRepository::with_users(users)),
            settings.clone(),
            audit_service(&audit),
        );
        Fixture {
            service,
            settings,
            questions,
            results,
            profiles,
            audit,
        }
    }

    fn student() -> User {
        User::new("ana@example.com".to_string(), "h".to_string(), Role::Student)
    }

    fn profile_for(user: &User, subjects: &[&str]) -> StudentProfile {
        StudentProfile {
            user_id: user.id.clone(),
            student_id_number: "1".to_string(),
            first_name: "Ana".to_string(),
            middle_name: "".to_string(),
            last_name: "Reyes".to_string(),
            email_address: user.email.clone(),
            username: "ana".to_string(),
            program_degree: "BSEd".to_string(),
            year_level: "4".to_string(),
            section_class: None,
            status: "Regular".to_string(),
            target_licensure: Licensure::Let,
            let_track: Some(LetTrack::Secondary),
            major_specialization: "Mathematics".to_string(),
            assigned_review_subjects: subjects.iter().map(|s| s.to_string()).collect(),
            required_passing_threshold: 75,
            updated_at: Utc::now(),
        }
    }

    async fn add_questions(
        questions: &MockQuestionRepository,
        exam_type: &str,
        subject: &str,
        count: usize,
    ) -> Vec<Question> {
        let mut created = Vec::new();
        for i in 0..count {
            let question = Question::from_new(NewQuestion {
                exam_type: exam_type.to_string(),
                subject: subject.to_string(),
                topic: format!("Topic {}", i),
                difficulty: Difficulty::Medium,
                question: format!("{} {} #{}", exam_type, subject, i),
                a: "a".to_string(),
                b: "b".to_string(),
                c: "c".to_string(),
                d: "d".to_string(),
                answer: AnswerOption::A,
            });
            questions.save(&question).await.unwrap();
            created.push(question);
        }
        created
    }

    #[tokio::test]
    async fn start_requires_a_profile() {
        let f = fixture(vec![]);
        let error = f.service.start_exam(&student()).await.unwrap_err();
        assert_eq!(error.detail(), "Profile not found");
    }

    #[tokio::test]
    async fn start_samples_from_matching_pool_without_answers() {
        let user = student();
        let f = fixture(vec![user.clone()]);
        f.profiles.save_student(&profile_for(&user, &["GenEd"])).await.unwrap();
        add_questions(&f.questions, "LET", "GenEd", 12).await;
        add_questions(&f.questions, "LET", "ProfEd", 5).await;
        add_questions(&f.questions, "CPA", "GenEd", 5).await;
        f.settings
            .update_settings(ExamSettingsDto {
                exam_time_limit_minutes: 30,
                exam_question_count: 10,
                exam_major_question_count: 0,
            })
            .await
            .unwrap();

        let exam = f.service.start_exam(&user).await.unwrap();

        assert_eq!(exam.len(), 10);
        let ids: HashSet<_> = exam.iter().map(|q| q.id.clone()).collect();
        assert_eq!(ids.len(), 10);
        assert!(exam.iter().all(|q| q.question.starts_with("LET GenEd")));
    }

    #[tokio::test]
    async fn start_reports_short_pool() {
        let user = student();
        let f = fixture(vec![user.clone()]);
        f.profiles.save_student(&profile_for(&user, &[])).await.unwrap();
        add_questions(&f.questions, "LET", "GenEd", 3).await;

        let error = f.service.start_exam(&user).await.unwrap_err();
        assert_eq!(
            error.detail(),
            "Not enough questions available for this track. Requested 50, but only 3 available."
        );
    }

    #[tokio::test]
    async fn submit_grades_persists_and_audits() {
        let user = student();
        let f = fixture(vec![user.clone()]);
        f.profiles.save_student(&profile_for(&user, &[])).await.unwrap();
        let bank = add_questions(&f.questions, "LET", "GenEd", 4).await;

        let answers: BTreeMap<String, String> = bank
            .iter()
            .enumerate()
            .map(|(i, q)| (q.id.clone(), if i < 3 { "A" } else { "B" }.to_string()))
            .collect();

        let result = f
            .service
            .submit_exam(&user, ExamSubmissionDto { answers })
            .await
            .unwrap();

        assert_eq!(result.email, "ana@example.com");
        assert_eq!(result.score, 3);
        assert_eq!(result.total, 4);
        assert_eq!(result.percentage, 75.0);
        assert_eq!(result.result, ExamOutcome::Pass);
        assert_eq!(result.incorrect_questions.len(), 1);
        assert_eq!(f.results.find_all().await.unwrap().len(), 1);
        assert_eq!(f.audit.actions(), vec![ACTION_EXAM_SUBMIT.to_string()]);

        let history = f.service.list_results(&user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].score, 3);
    }

    #[tokio::test]
    async fn stats_summarize_attempts() {
        let user = student();
        let f = fixture(vec![user.clone()]);

        let empty = f.service.stats().await.unwrap();
        assert_eq!(empty.avg_score, 0.0);
        assert_eq!(empty.completion_rate, 0.0);
        assert_eq!(empty.active_students, 1);

        let now = Utc::now();
        for (i, percentage) in [50.0, 70.0, 90.0].into_iter().enumerate() {
            let mut result = ExamResult::from_grade(
                user.id.clone(),
                "LET".to_string(),
                grade_submission(&BTreeMap::new(), &HashMap::new(), "LET", 0),
            );
            result.percentage = percentage;
            result.total = 25;
            result.created_at = now + Duration::minutes(i as i64);
            f.results.save(&result).await.unwrap();
        }

        let stats = f.service.stats().await.unwrap();
        assert_eq!(stats.avg_score, 70.0);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.recent_scores, vec![50.0, 70.0, 90.0]);
    }

    #[tokio::test]
    async fn completion_rate_rounds_ties_to_even() {
        let user = student();
        let f = fixture(vec![user.clone()]);

        for total in [10, 10, 4, 1] {
            let mut result = ExamResult::from_grade(
                user.id.clone(),
                "LET".to_string(),
                grade_submission(&BTreeMap::new(), &HashMap::new(), "LET", 0),
            );
            result.total = total;
            f.results.save(&result).await.unwrap();
        }

        // 25 answered out of 4 x 50 expected is exactly 12.5%.
        let stats = f.service.stats().await.unwrap();
        assert_eq!(stats.completion_rate, 12.0);
    }
}
