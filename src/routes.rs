// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{ai_quiz, dashboard, question_bank},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (question banks with the AI quiz flow, instructors).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool, Config, Quiz Generator).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let question_bank_routes = Router::new()
        .route("/", post(question_bank::create_question_bank))
        .route("/{id}", get(question_bank::get_question_bank))
        .route("/{id}/ai-quiz/generate", post(ai_quiz::generate_quiz_draft))
        .route("/{id}/ai-quiz/approve", post(ai_quiz::approve_quiz_questions));

    let instructor_routes = Router::new()
        .route("/{id}/dashboard", get(dashboard::get_instructor_dashboard));

    Router::new()
        .nest("/api/question-banks", question_bank_routes)
        .nest("/api/instructors", instructor_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
