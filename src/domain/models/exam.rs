use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::licensure::performance_bucket;
use crate::domain::models::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExamOutcome {
    #[serde(rename = "PASS")]
    Pass,
    #[serde(rename = "FAIL")]
    Fail,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub correct: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncorrectQuestion {
    pub id: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: String,
    pub question: String,
    pub correct_answer: String,
    pub student_answer: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: String,
    pub user_id: String,
    pub exam_type: String,
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub result: ExamOutcome,
    pub subject_performance: BTreeMap<String, SubjectScore>,
    pub incorrect_questions: Vec<IncorrectQuestion>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of scoring one submission, before it is attached to a user.
#[derive(Debug, Clone)]
pub struct Grade {
    pub score: u32,
    pub total: u32,
    pub percentage: f64,
    pub outcome: ExamOutcome,
    pub subject_performance: BTreeMap<String, SubjectScore>,
    pub incorrect_questions: Vec<IncorrectQuestion>,
}

impl ExamResult {
    pub fn from_grade(user_id: String, exam_type: String, grade: Grade) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            exam_type,
            score: grade.score,
            total: grade.total,
            percentage: grade.percentage,
            result: grade.outcome,
            subject_performance: grade.subject_performance,
            incorrect_questions: grade.incorrect_questions,
            created_at: Utc::now(),
        }
    }
}

/// Rounds to two decimal places, ties to even.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Scores a set of `question id -> selected option` answers.
///
/// Every submitted answer counts toward the total, including answers whose
/// question no longer exists in the bank; those are otherwise ignored.
pub fn grade_submission(
    answers: &BTreeMap<String, String>,
    questions: &HashMap<String, Question>,
    licensure: &str,
    passing_threshold: u32,
) -> Grade {
    let mut score = 0u32;
    let mut subject_performance: BTreeMap<String, SubjectScore> = BTreeMap::new();
    let mut incorrect_questions = Vec::new();

    for (question_id, selected) in answers {
        let Some(question) = questions.get(question_id) else {
            continue;
        };

        let bucket = performance_bucket(licensure, &question.subject, &question.topic);
        let stats = subject_performance.entry(bucket).or_default();
        stats.total += 1;

        if selected == question.answer.as_str() {
            score += 1;
            stats.correct += 1;
        } else {
            let reference = if question.topic.is_empty() {
                "Review this topic".to_string()
            } else {
                format!("Review: {}", question.topic)
            };
            incorrect_questions.push(IncorrectQuestion {
                id: question.id.clone(),
                subject: question.subject.clone(),
                topic: question.topic.clone(),
                difficulty: question.difficulty.to_string(),
                question: question.question.clone(),
                correct_answer: question.answer.as_str().to_string(),
                student_answer: selected.clone(),
                reference,
            });
        }
    }

    let total = answers.len() as u32;
    let percentage = if total == 0 {
        0.0
    } else {
        round2(f64::from(score) / f64::from(total) * 100.0)
    };
    let outcome = if percentage >= f64::from(passing_threshold) {
        ExamOutcome::Pass
    } else {
        ExamOutcome::Fail
    };

    Grade {
        score,
        total,
        percentage,
        outcome,
        subject_performance,
        incorrect_questions,
    }
}
