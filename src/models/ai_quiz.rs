// src/models/ai_quiz.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// One answer choice of a generated question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedOption {
    #[validate(
        length(min = 1, max = 1000, message = "Answer text must be between 1 and 1000 characters"),
        custom(function = validate_not_blank)
    )]
    pub answer_text: String,

    #[serde(default)]
    pub is_correct: bool,
}

/// A multiple-choice question produced by the generator.
///
/// Never persisted as-is: it lives on the client between generation and
/// approval, and the instructor may edit it before sending it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    #[validate(
        length(min = 1, max = 2000, message = "Question text must be between 1 and 2000 characters"),
        custom(function = validate_not_blank)
    )]
    pub question_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 4000))]
    pub explanation: Option<String>,

    #[validate(
        length(min = 2, max = 10, message = "A question needs between 2 and 10 options"),
        custom(function = validate_single_correct),
        nested
    )]
    pub options: Vec<GeneratedOption>,
}

/// DTO for requesting a quiz draft from the generator.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AiQuizGenerateRequest {
    /// Free-text instructor notes forwarded to the generator.
    #[validate(length(max = 2000, message = "Extra info must be at most 2000 characters"))]
    pub extra_info: Option<String>,

    /// Number of questions; falls back to the configured default.
    pub count: Option<u32>,
}

/// Generated questions staged for review. Nothing here is persisted yet.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiQuizDraftResponse {
    pub question_bank_id: i64,
    pub lesson_id: i64,
    pub questions: Vec<GeneratedQuestion>,
}

/// DTO for committing reviewed questions into a bank.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AiQuizApproveRequest {
    #[validate(
        length(min = 1, max = 50, message = "Between 1 and 50 questions can be approved at once"),
        nested
    )]
    pub questions: Vec<GeneratedQuestion>,
}

/// Outcome of an approval. `created_questions_count` always equals the
/// number of ids, which is why the fields are only set through `new`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiQuizApproveResult {
    pub question_bank_id: i64,
    pub created_questions_count: usize,
    pub created_question_ids: Vec<i64>,
}

impl AiQuizApproveResult {
    pub fn new(question_bank_id: i64, created_question_ids: Vec<i64>) -> Self {
        Self {
            question_bank_id,
            created_questions_count: created_question_ids.len(),
            created_question_ids,
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

/// Index of the correct option, if exactly one is marked.
pub fn correct_index(options: &[GeneratedOption]) -> Option<usize> {
    let mut correct = options.iter().enumerate().filter(|(_, o)| o.is_correct);
    match (correct.next(), correct.next()) {
        (Some((idx, _)), None) => Some(idx),
        _ => None,
    }
}

/// Exactly one option must be marked correct.
fn validate_single_correct(options: &[GeneratedOption]) -> Result<(), validator::ValidationError> {
    if correct_index(options).is_none() {
        let marked = options.iter().filter(|o| o.is_correct).count();
        let mut err = validator::ValidationError::new("single_correct_option");
        err.message = Some(
            format!("Exactly one option must be correct, found {}", marked).into(),
        );
        return Err(err);
    }
    Ok(())
}
