// src/ai/fixed.rs

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{GenerationError, GenerationRequest, QuizGenerator, finalize_questions};
use crate::models::ai_quiz::{GeneratedOption, GeneratedQuestion};

/// Deterministic generator that always answers with the same questions.
///
/// Applies the same output policy as the real backend, so asking for more
/// questions than it holds fails with `Incomplete`. Every request is
/// recorded for inspection.
#[derive(Debug, Default)]
pub struct FixedQuizGenerator {
    questions: Vec<GeneratedQuestion>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FixedQuizGenerator {
    pub fn new(questions: Vec<GeneratedQuestion>) -> Self {
        Self {
            questions,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Five general science questions.
    pub fn sample() -> Self {
        let q = |text: &str, options: &[&str], correct: usize, explanation: Option<&str>| {
            GeneratedQuestion {
                question_text: text.to_string(),
                explanation: explanation.map(str::to_string),
                options: options
                    .iter()
                    .enumerate()
                    .map(|(i, answer)| GeneratedOption {
                        answer_text: answer.to_string(),
                        is_correct: i == correct,
                    })
                    .collect(),
            }
        };

        Self::new(vec![
            q(
                "What does photosynthesis convert light into?",
                &["Chemical energy", "Sound", "Magnetism", "Heat only"],
                0,
                Some("Plants store light energy as glucose."),
            ),
            q(
                "Which pigment absorbs most of the light used in photosynthesis?",
                &["Melanin", "Chlorophyll", "Hemoglobin"],
                1,
                None,
            ),
            q(
                "Which gas do plants take in during photosynthesis?",
                &["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"],
                2,
                Some("CO2 is fixed into sugars in the Calvin cycle."),
            ),
            q(
                "Where in the cell does photosynthesis happen?",
                &["Mitochondria", "Nucleus", "Chloroplast"],
                2,
                None,
            ),
            q(
                "Which gas is released as a by-product?",
                &["Oxygen", "Methane"],
                0,
                None,
            ),
        ])
    }

    /// Requests received so far, oldest first.
    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl QuizGenerator for FixedQuizGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        finalize_questions(self.questions.clone(), request.count)
    }
}
