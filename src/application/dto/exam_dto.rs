use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::models::exam::{ExamOutcome, ExamResult, IncorrectQuestion, SubjectScore};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSubmissionDto {
    /// question id -> selected option (`A`..`D`)
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamSubmissionResultDto {
    pub email: String,
    pub exam_type: String,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub result: ExamOutcome,
    pub subject_performance: BTreeMap<String, SubjectScore>,
    pub incorrect_questions: Vec<IncorrectQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResultDto {
    pub id: String,
    pub exam_type: String,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub result: ExamOutcome,
    pub subject_performance: BTreeMap<String, SubjectScore>,
    pub incorrect_questions: Vec<IncorrectQuestion>,
    pub created_at: String,
}

impl From<ExamResult> for ExamResultDto {
    fn from(result: ExamResult) -> Self {
        Self {
            id: result.id,
            exam_type: result.exam_type,
            score: result.score,
            total: result.total,
            percentage: result.percentage,
            result: result.result,
            subject_performance: result.subject_performance,
            incorrect_questions: result.incorrect_questions,
            created_at: result.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamStatsDto {
    pub avg_score: f64,
    pub completion_rate: f64,
    pub active_students: usize,
    pub recent_scores: Vec<f64>,
}
