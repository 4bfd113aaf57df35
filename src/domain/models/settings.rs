use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 90;
pub const DEFAULT_QUESTION_COUNT: u32 = 50;
pub const DEFAULT_MAJOR_QUESTION_COUNT: u32 = 50;

/// Exam settings shared by every candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamSettings {
    pub exam_time_limit_minutes: u32,
    pub exam_question_count: u32,
    #[serde(default = "default_major_question_count")]
    pub exam_major_question_count: u32,
}

fn default_major_question_count() -> u32 {
    DEFAULT_MAJOR_QUESTION_COUNT
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            exam_time_limit_minutes: DEFAULT_TIME_LIMIT_MINUTES,
            exam_question_count: DEFAULT_QUESTION_COUNT,
            exam_major_question_count: DEFAULT_MAJOR_QUESTION_COUNT,
        }
    }
}

impl ExamSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(10..=240).contains(&self.exam_time_limit_minutes) {
            return Err("exam_time_limit_minutes must be between 10 and 240".to_string());
        }
        if !(10..=200).contains(&self.exam_question_count) {
            return Err("exam_question_count must be between 10 and 200".to_string());
        }
        if self.exam_major_question_count > 200 {
            return Err("exam_major_question_count must be between 0 and 200".to_string());
        }
        Ok(())
    }
}
