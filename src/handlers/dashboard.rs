// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;

use crate::{error::AppError, models::dashboard::InstructorDashboard};

/// Summarizes an instructor's courses, enrollments, quizzes and quiz scores.
///
/// Read-only. The average is `null` when no attempt exists.
pub async fn get_instructor_dashboard(
    State(pool): State<SqlitePool>,
    Path(instructor_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let dashboard = sqlx::query_as::<_, InstructorDashboard>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM courses WHERE instructor_id = ?1) AS courses_created,
            (SELECT COUNT(*)
               FROM enrollments e
               JOIN courses c ON e.course_id = c.id
              WHERE c.instructor_id = ?1) AS total_enrollments,
            (SELECT COUNT(*)
               FROM quizzes q
               JOIN courses c ON q.course_id = c.id
              WHERE c.instructor_id = ?1 AND q.is_published = 1) AS quizzes_published,
            (SELECT AVG(a.score)
               FROM quiz_attempts a
               JOIN quizzes q ON a.quiz_id = q.id
               JOIN courses c ON q.course_id = c.id
              WHERE c.instructor_id = ?1) AS avg_quiz_score
        "#,
    )
    .bind(instructor_id)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to build instructor dashboard: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(dashboard))
}
