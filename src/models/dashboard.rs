// src/models/dashboard.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Read-only summary of an instructor's courses.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructorDashboard {
    pub courses_created: i64,
    pub total_enrollments: i64,
    pub quizzes_published: i64,

    /// `None` (serialized as `null`) when no attempt has been recorded.
    pub avg_quiz_score: Option<f64>,
}
