use async_trait::async_trait;

use super::{GenerationError, GenerationRequest, QuizGenerator};
use crate::models::ai_quiz::GeneratedQuestion;

/// Stand-in used when no AI credentials are configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledQuizGenerator;

#[async_trait]
impl QuizGenerator for DisabledQuizGenerator {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        Err(GenerationError::NotConfigured)
    }
}
