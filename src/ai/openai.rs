// src/ai/openai.rs

use std::{sync::LazyLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

use super::{GenerationError, GenerationRequest, QuizGenerator, finalize_questions, prompt};
use crate::{config::AiConfig, models::ai_quiz::GeneratedQuestion};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*(.*?)\s*```\s*$").expect("code fence regex is valid")
});

/// Quiz generator backed by an OpenAI-compatible chat completions API.
#[derive(Debug, Clone)]
pub struct OpenAiQuizGenerator {
    client: Client,
    endpoint: Url,
    api_key: String,
    model: String,
    max_retries: u32,
    retry_backoff: Duration,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Models sometimes drop the wrapper object and answer with a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuizPayload {
    Wrapped { questions: Vec<GeneratedQuestion> },
    Bare(Vec<GeneratedQuestion>),
}

impl OpenAiQuizGenerator {
    pub fn new(config: &AiConfig, api_key: String) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        let endpoint = config
            .api_base_url
            .join("chat/completions")
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
            model: config.model.clone(),
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(500),
        })
    }

    /// Overrides the base delay between attempts (multiplied by the attempt number).
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": prompt::build_messages(request),
            "response_format": { "type": "json_object" },
            "temperature": 0.7
        });

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let detail = format!("HTTP {}: {}", status, truncate(&detail, 200));
            return Err(
                if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    GenerationError::Unavailable(detail)
                } else {
                    GenerationError::Rejected(detail)
                },
            );
        }

        let completion: ChatCompletion = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout
            } else {
                GenerationError::Malformed(e.to_string())
            }
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| GenerationError::Malformed("response has no message content".to_string()))?;

        let questions = parse_questions(&content)?;
        finalize_questions(questions, request.count)
    }
}

#[async_trait]
impl QuizGenerator for OpenAiQuizGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<GeneratedQuestion>, GenerationError> {
        let mut attempt = 0;
        loop {
            match self.attempt(request).await {
                Ok(questions) => return Ok(questions),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Quiz generation failed, retrying in {:?}... (Attempt {}): {}",
                        self.retry_backoff * attempt,
                        attempt,
                        e
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => {
                    tracing::error!("Quiz generation failed after {} attempts: {}", attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }
}

fn map_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Unavailable(err.to_string())
    }
}

/// Parses message content into questions, tolerating a Markdown code fence.
fn parse_questions(content: &str) -> Result<Vec<GeneratedQuestion>, GenerationError> {
    let json = match CODE_FENCE.captures(content) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()),
        None => content.trim(),
    };

    let payload: QuizPayload = serde_json::from_str(json)
        .map_err(|e| GenerationError::Malformed(e.to_string()))?;

    Ok(match payload {
        QuizPayload::Wrapped { questions } => questions,
        QuizPayload::Bare(questions) => questions,
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
