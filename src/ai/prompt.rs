// src/ai/prompt.rs

use serde_json::json;

use super::GenerationRequest;

const SYSTEM_PROMPT: &str = r#"You are an experienced teacher writing quiz questions for an online course.
Write multiple-choice questions that check understanding of the lesson text you are given.

Rules:
1. Generate exactly the requested number of questions.
2. Every question has between 2 and 6 options and exactly one correct option.
3. Base every question on the lesson text only.
4. Vary the position of the correct option.
5. Answer with a single JSON object and nothing else, shaped like:
{"questions":[{"questionText":"...","explanation":"...","options":[{"answerText":"...","isCorrect":true},{"answerText":"...","isCorrect":false}]}]}"#;

/// Builds the chat messages for one generation request.
pub fn build_messages(request: &GenerationRequest) -> serde_json::Value {
    let mut user = format!(
        "Number of questions: {}\n\nLesson text:\n{}",
        request.count,
        request.lesson_text.trim()
    );

    if let Some(extra) = request.extra_info.as_deref().map(str::trim).filter(|e| !e.is_empty()) {
        user.push_str("\n\nAdditional instructions from the instructor:\n");
        user.push_str(extra);
    }

    json!([
        { "role": "system", "content": SYSTEM_PROMPT },
        { "role": "user", "content": user }
    ])
}
