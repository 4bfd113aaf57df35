use serde::{Deserialize, Serialize};

use crate::domain::models::question::Question;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDto {
    pub id: String,
    pub exam_type: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: String,
    pub question: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub answer: String,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            exam_type: question.exam_type,
            subject: question.subject,
            topic: question.topic,
            difficulty: question.difficulty.to_string(),
            question: question.question,
            a: question.a,
            b: question.b,
            c: question.c,
            d: question.d,
            answer: question.answer.as_str().to_string(),
        }
    }
}

/// New question fields; also the row shape of a CSV import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionDto {
    pub exam_type: String,
    pub subject: String,
    pub topic: String,
    pub difficulty: String,
    pub question: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub answer: String,
}

/// A question as served to a candidate: the answer key is withheld.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamQuestionDto {
    pub id: String,
    pub question: String,
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
    pub difficulty: String,
}

impl From<Question> for ExamQuestionDto {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            question: question.question,
            a: question.a,
            b: question.b,
            c: question.c,
            d: question.d,
            difficulty: question.difficulty.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedCountDto {
    pub deleted: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResultDto {
    pub added: usize,
}
