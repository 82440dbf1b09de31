// tests/openai_generator_tests.rs

use std::{io::Write, time::Duration};

use learnhub::{
    ai::{GenerationError, GenerationRequest, OpenAiQuizGenerator, QuizGenerator},
    config::{AiConfig, parse_base_url},
    models::ai_quiz::correct_index,
};
use serde_json::json;

fn request(count: u32) -> GenerationRequest {
    GenerationRequest {
        lesson_text: "Photosynthesis converts light to energy.".to_string(),
        count,
        extra_info: Some("Use simple words".to_string()),
    }
}

fn generator(base_url: &str, max_retries: u32) -> OpenAiQuizGenerator {
    let config = AiConfig {
        api_base_url: parse_base_url(base_url).unwrap(),
        timeout_secs: 5,
        max_retries,
        ..AiConfig::default()
    };
    OpenAiQuizGenerator::new(&config, "test-key".to_string())
        .unwrap()
        .with_retry_backoff(Duration::ZERO)
}

fn completion(content: &str) -> String {
    json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

fn quiz_content(count: usize) -> String {
    let questions: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "questionText": format!("Question {}?", i + 1),
                "explanation": "Light is turned into chemical energy.",
                "options": [
                    { "answerText": "Chemical energy", "isCorrect": true },
                    { "answerText": "Sound", "isCorrect": false }
                ]
            })
        })
        .collect();
    json!({ "questions": questions }).to_string()
}

#[tokio::test]
async fn generates_questions_from_chat_completion() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .match_header("authorization", "Bearer test-key")
        .match_body(mockito::Matcher::Regex("Use simple words".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&quiz_content(3)))
        .create_async()
        .await;

    let questions = generator(&format!("{}/v1", server.url()), 0)
        .generate(&request(3))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(questions.len(), 3);
    assert_eq!(questions[0].question_text, "Question 1?");
    assert_eq!(correct_index(&questions[2].options), Some(0));
}

#[tokio::test]
async fn surplus_questions_are_truncated() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&format!("```json\n{}\n```", quiz_content(5))))
        .create_async()
        .await;

    let questions = generator(&format!("{}/v1", server.url()), 0)
        .generate(&request(2))
        .await
        .unwrap();

    assert_eq!(questions.len(), 2);
}

#[tokio::test]
async fn short_answer_is_retried_then_reported_incomplete() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion(&quiz_content(1)))
        .expect(3)
        .create_async()
        .await;

    let err = generator(&format!("{}/v1", server.url()), 2)
        .generate(&request(3))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(
        err,
        GenerationError::Incomplete { requested: 3, received: 1 }
    ));
}

#[tokio::test]
async fn server_error_is_retried_up_to_the_limit() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body("overloaded")
        .expect(3)
        .create_async()
        .await;

    let err = generator(&format!("{}/v1", server.url()), 2)
        .generate(&request(1))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, GenerationError::Unavailable(_)));
}

#[tokio::test]
async fn client_error_fails_fast() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/chat/completions")
        .with_status(401)
        .with_body(r#"{"error":"invalid api key"}"#)
        .expect(1)
        .create_async()
        .await;

    let err = generator(&format!("{}/v1", server.url()), 3)
        .generate(&request(1))
        .await
        .unwrap_err();

    mock.assert_async().await;
    assert!(matches!(err, GenerationError::Rejected(_)));
}

#[tokio::test]
async fn prose_answer_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(completion("I cannot help with that."))
        .create_async()
        .await;

    let err = generator(&format!("{}/v1", server.url()), 0)
        .generate(&request(1))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Malformed(_)));
}

#[tokio::test]
async fn slow_backend_times_out() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(completion(&quiz_content(1)).as_bytes())
        })
        .create_async()
        .await;

    let config = AiConfig {
        api_base_url: parse_base_url(&format!("{}/v1", server.url())).unwrap(),
        timeout_secs: 1,
        max_retries: 0,
        ..AiConfig::default()
    };
    let err = OpenAiQuizGenerator::new(&config, "test-key".to_string())
        .unwrap()
        .generate(&request(1))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Timeout), "got {:?}", err);
}
