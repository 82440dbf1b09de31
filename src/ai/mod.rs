// src/ai/mod.rs

//! Boundary between the platform and an external text-generation service.
//!
//! Handlers only see [`QuizGenerator`]; which backend sits behind it is
//! decided once at startup.

pub mod disabled;
pub mod fixed;
pub mod openai;
pub mod prompt;

use std::fmt;

use async_trait::async_trait;
use validator::Validate;

use crate::models::ai_quiz::{GeneratedOption, GeneratedQuestion};

pub use disabled::DisabledQuizGenerator;
pub use fixed::FixedQuizGenerator;
pub use openai::OpenAiQuizGenerator;

/// Input of a single generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub lesson_text: String,
    pub count: u32,
    /// Instructor notes, used as extra guidance only.
    pub extra_info: Option<String>,
}

#[derive(Debug)]
pub enum GenerationError {
    /// The backend did not answer in time.
    Timeout,
    /// Network failure or a transient status (429, 5xx).
    Unavailable(String),
    /// The backend refused the request (4xx other than 429).
    Rejected(String),
    /// The answer could not be parsed into questions.
    Malformed(String),
    /// Fewer usable questions than requested.
    Incomplete { requested: u32, received: usize },
    /// No backend credentials were configured.
    NotConfigured,
}

impl GenerationError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Timeout
                | GenerationError::Unavailable(_)
                | GenerationError::Malformed(_)
                | GenerationError::Incomplete { .. }
        )
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationError::Timeout => write!(f, "Quiz generator timed out"),
            GenerationError::Unavailable(msg) => write!(f, "Quiz generator unavailable: {}", msg),
            GenerationError::Rejected(msg) => write!(f, "Quiz generator rejected the request: {}", msg),
            GenerationError::Malformed(msg) => write!(f, "Quiz generator returned malformed output: {}", msg),
            GenerationError::Incomplete { requested, received } => write!(
                f,
                "Quiz generator returned {} usable questions, {} requested",
                received, requested
            ),
            GenerationError::NotConfigured => write!(f, "Quiz generator is not configured"),
        }
    }
}

impl std::error::Error for GenerationError {}

/// Produces multiple-choice questions from lesson text.
///
/// Implementations return exactly `request.count` questions, each with at
/// least two options and exactly one correct option, or an error.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError>;
}

/// Trims surrounding whitespace from every text field.
///
/// Text is otherwise kept byte-for-byte; escaping is up to whoever renders it.
pub fn normalize_question(question: GeneratedQuestion) -> GeneratedQuestion {
    GeneratedQuestion {
        question_text: question.question_text.trim().to_string(),
        explanation: question
            .explanation
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty()),
        options: question
            .options
            .into_iter()
            .map(|o| GeneratedOption {
                answer_text: o.answer_text.trim().to_string(),
                is_correct: o.is_correct,
            })
            .collect(),
    }
}

/// Applies the output policy to raw backend output.
///
/// Unusable questions are dropped, the surplus is cut to `count`, and a
/// shortfall is an error rather than a partial result.
pub fn finalize_questions(
    raw: Vec<GeneratedQuestion>,
    count: u32,
) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let total = raw.len();
    let mut usable: Vec<GeneratedQuestion> = raw
        .into_iter()
        .map(normalize_question)
        .filter(|q| match q.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Discarding generated question {:?}: {}", q.question_text, e);
                false
            }
        })
        .collect();

    if usable.len() < count as usize {
        return Err(GenerationError::Incomplete {
            requested: count,
            received: usable.len(),
        });
    }

    if usable.len() > count as usize {
        tracing::debug!("Generator returned {} questions, keeping {}", total, count);
    }
    usable.truncate(count as usize);
    Ok(usable)
}
