// src/handlers/ai_quiz.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use sqlx::{SqliteConnection, SqlitePool};
use validator::Validate;

use crate::{
    ai::{GenerationRequest, QuizGenerator, normalize_question},
    config::Config,
    error::AppError,
    models::{
        ai_quiz::{
            AiQuizApproveRequest, AiQuizApproveResult, AiQuizDraftResponse,
            AiQuizGenerateRequest, GeneratedQuestion,
        },
        lesson::Lesson,
        question_bank::QuestionBank,
    },
};

/// Resolves the requested question count against configured limits.
fn resolve_count(requested: Option<u32>, config: &Config) -> Result<u32, AppError> {
    let count = requested.unwrap_or(config.ai.default_question_count);
    if count == 0 || count > config.ai.max_question_count {
        return Err(AppError::BadRequest(format!(
            "count must be between 1 and {}",
            config.ai.max_question_count
        )));
    }
    Ok(count)
}

/// Generates a quiz draft for a question bank from its lesson text.
///
/// The draft is returned for review only. Nothing is written to the
/// database until the instructor approves it.
pub async fn generate_quiz_draft(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(generator): State<Arc<dyn QuizGenerator>>,
    Path(bank_id): Path<i64>,
    payload: Option<Json<AiQuizGenerateRequest>>,
) -> Result<impl IntoResponse, AppError> {
    // Every field is optional, so an empty body means "all defaults"
    let payload = payload.map(|Json(p)| p).unwrap_or_default();

    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let count = resolve_count(payload.count, &config)?;

    let bank = sqlx::query_as::<_, QuestionBank>(
        "SELECT id, course_id, lesson_id, name, created_at FROM question_banks WHERE id = ?",
    )
    .bind(bank_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Question bank not found".to_string()))?;

    let lesson_id = bank.lesson_id.ok_or(AppError::BadRequest(
        "Question bank is not linked to a lesson".to_string(),
    ))?;

    let lesson = sqlx::query_as::<_, Lesson>(
        "SELECT id, course_id, title, content, created_at FROM lessons WHERE id = ?",
    )
    .bind(lesson_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Lesson not found".to_string()))?;

    if lesson.content.trim().is_empty() {
        return Err(AppError::BadRequest("Lesson has no content to generate from".to_string()));
    }

    let request = GenerationRequest {
        lesson_text: lesson.content,
        count,
        extra_info: payload.extra_info,
    };

    tracing::info!(
        "Generating {} quiz questions for bank {} from lesson {}",
        count,
        bank.id,
        lesson.id
    );

    let questions = generator.generate(&request).await?;

    Ok(Json(AiQuizDraftResponse {
        question_bank_id: bank.id,
        lesson_id: lesson.id,
        questions,
    }))
}

/// Commits reviewed questions into a bank.
///
/// All questions are validated before any write, and every insert shares
/// one transaction: either the whole batch is stored or nothing is.
pub async fn approve_quiz_questions(
    State(pool): State<SqlitePool>,
    Path(bank_id): Path<i64>,
    Json(payload): Json<AiQuizApproveRequest>,
) -> Result<impl IntoResponse, AppError> {
    let questions: Vec<GeneratedQuestion> =
        payload.questions.into_iter().map(normalize_question).collect();

    let approved = AiQuizApproveRequest { questions };
    approved
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Take the write lock up front; a deferred transaction that reads first
    // fails with SQLITE_BUSY instead of waiting when approvals overlap.
    let mut tx = pool.begin_with("BEGIN IMMEDIATE").await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM question_banks WHERE id = ?")
        .bind(bank_id)
        .fetch_optional(&mut *tx)
        .await?;

    if exists.is_none() {
        return Err(AppError::NotFound("Question bank not found".to_string()));
    }

    let mut created_ids = Vec::with_capacity(approved.questions.len());
    for question in &approved.questions {
        let id = insert_question(&mut *tx, bank_id, question)
            .await
            .map_err(|e| {
                tracing::error!("Failed to persist approved question: {:?}", e);
                AppError::from(e)
            })?;
        created_ids.push(id);
    }

    tx.commit().await?;

    tracing::info!(
        "Approved {} AI-generated questions into bank {}",
        created_ids.len(),
        bank_id
    );

    Ok((
        StatusCode::CREATED,
        Json(AiQuizApproveResult::new(bank_id, created_ids)),
    ))
}

/// Inserts one question and its options, keeping option order.
async fn insert_question(
    conn: &mut SqliteConnection,
    bank_id: i64,
    question: &GeneratedQuestion,
) -> Result<i64, sqlx::Error> {
    let question_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions (question_bank_id, question_text, explanation, source)
        VALUES (?, ?, ?, 'ai')
        RETURNING id
        "#,
    )
    .bind(bank_id)
    .bind(&question.question_text)
    .bind(&question.explanation)
    .fetch_one(&mut *conn)
    .await?;

    for (position, option) in question.options.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO question_options (question_id, position, answer_text, is_correct)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(question_id)
        .bind(position as i64)
        .bind(&option.answer_text)
        .bind(option.is_correct)
        .execute(&mut *conn)
        .await?;
    }

    Ok(question_id)
}
