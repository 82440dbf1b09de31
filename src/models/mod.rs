// src/models/mod.rs

pub mod ai_quiz;
pub mod dashboard;
pub mod lesson;
pub mod question_bank;
