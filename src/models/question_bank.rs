// src/models/question_bank.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'question_banks' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBank {
    pub id: i64,
    pub course_id: i64,

    /// Lesson whose text feeds AI generation for this bank.
    pub lesson_id: Option<i64>,

    pub name: String,
    pub created_at: chrono::NaiveDateTime,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionRow {
    pub id: i64,
    pub question_bank_id: i64,
    pub question_text: String,
    pub explanation: Option<String>,
    /// 'manual' or 'ai'.
    pub source: String,
    pub created_at: chrono::NaiveDateTime,
}

/// Represents the 'question_options' table in the database.
#[derive(Debug, Clone, FromRow)]
pub struct QuestionOptionRow {
    pub id: i64,
    pub question_id: i64,
    pub position: i64,
    pub answer_text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOptionResponse {
    pub id: i64,
    pub answer_text: String,
    pub is_correct: bool,
}

/// A persisted question with its options in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: i64,
    pub question_text: String,
    pub explanation: Option<String>,
    pub source: String,
    pub created_at: chrono::NaiveDateTime,
    pub options: Vec<QuestionOptionResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionBankDetail {
    #[serde(flatten)]
    pub bank: QuestionBank,
    pub questions: Vec<QuestionResponse>,
}

/// DTO for creating a new question bank.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuestionBankRequest {
    pub course_id: i64,
    pub lesson_id: Option<i64>,
    #[validate(length(min = 1, max = 200, message = "Name must be between 1 and 200 characters"))]
    pub name: String,
}
