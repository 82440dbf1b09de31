// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents the 'lessons' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub course_id: i64,
    pub title: String,

    /// Lesson text; this is what the quiz generator reads.
    pub content: String,

    pub created_at: chrono::NaiveDateTime,
}
