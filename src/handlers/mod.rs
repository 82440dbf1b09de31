// src/handlers/mod.rs

pub mod ai_quiz;
pub mod dashboard;
pub mod question_bank;
