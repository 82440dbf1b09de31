// src/handlers/question_bank.rs

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::question_bank::{
        CreateQuestionBankRequest, QuestionBank, QuestionBankDetail, QuestionOptionResponse,
        QuestionOptionRow, QuestionResponse, QuestionRow,
    },
};

/// Creates a question bank for a course, optionally tied to one lesson.
pub async fn create_question_bank(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateQuestionBankRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    sqlx::query_scalar::<_, i64>("SELECT id FROM courses WHERE id = ?")
        .bind(payload.course_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(AppError::NotFound("Course not found".to_string()))?;

    if let Some(lesson_id) = payload.lesson_id {
        let lesson_course = sqlx::query_scalar::<_, i64>("SELECT course_id FROM lessons WHERE id = ?")
            .bind(lesson_id)
            .fetch_optional(&pool)
            .await?
            .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

        if lesson_course != payload.course_id {
            return Err(AppError::BadRequest(
                "Lesson does not belong to this course".to_string(),
            ));
        }
    }

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO question_banks (course_id, lesson_id, name)
        VALUES (?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(payload.course_id)
    .bind(payload.lesson_id)
    .bind(payload.name.trim())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create question bank: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": id }))))
}

/// Returns a bank with all its persisted questions and their options.
pub async fn get_question_bank(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let bank = sqlx::query_as::<_, QuestionBank>(
        "SELECT id, course_id, lesson_id, name, created_at FROM question_banks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question bank not found".to_string()))?;

    let questions = sqlx::query_as::<_, QuestionRow>(
        r#"
        SELECT id, question_bank_id, question_text, explanation, source, created_at
        FROM questions
        WHERE question_bank_id = ?
        ORDER BY id
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    let options = sqlx::query_as::<_, QuestionOptionRow>(
        r#"
        SELECT o.id, o.question_id, o.position, o.answer_text, o.is_correct
        FROM question_options o
        JOIN questions q ON o.question_id = q.id
        WHERE q.question_bank_id = ?
        ORDER BY o.question_id, o.position
        "#,
    )
    .bind(id)
    .fetch_all(&pool)
    .await?;

    Ok(Json(QuestionBankDetail {
        bank,
        questions: assemble_questions(questions, options),
    }))
}

/// Attaches option rows to their questions. Option order is preserved.
fn assemble_questions(
    questions: Vec<QuestionRow>,
    options: Vec<QuestionOptionRow>,
) -> Vec<QuestionResponse> {
    let mut by_question: HashMap<i64, Vec<QuestionOptionResponse>> = HashMap::new();
    for opt in options {
        by_question
            .entry(opt.question_id)
            .or_default()
            .push(QuestionOptionResponse {
                id: opt.id,
                answer_text: opt.answer_text,
                is_correct: opt.is_correct,
            });
    }

    questions
        .into_iter()
        .map(|q| QuestionResponse {
            options: by_question.remove(&q.id).unwrap_or_default(),
            id: q.id,
            question_text: q.question_text,
            explanation: q.explanation,
            source: q.source,
            created_at: q.created_at,
        })
        .collect()
}
