// tests/common/mod.rs

#![allow(dead_code)]

use std::sync::Arc;

use learnhub::{
    ai::QuizGenerator,
    config::{AiConfig, Config},
    db, routes,
    state::AppState,
};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tempfile::TempDir;

pub struct TestApp {
    /// Base URL, e.g. "http://127.0.0.1:12345".
    pub address: String,
    pub pool: SqlitePool,
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        ai: AiConfig::default(),
    }
}

/// Fresh in-memory database with migrations applied.
///
/// A single connection that never expires, since every SQLite memory
/// connection is its own database.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    pool
}

/// File-backed database with the server's connection settings and
/// several connections, so writers really contend for the lock.
///
/// Keep the returned directory alive for the duration of the test.
pub async fn file_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!("sqlite://{}", dir.path().join("learnhub.db").display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(db::connect_options(&url).expect("Invalid SQLite URL"))
        .await
        .expect("Failed to open file-backed SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    (pool, dir)
}

/// Spawns the app on a random port backed by the given generator.
pub async fn spawn_app(generator: Arc<dyn QuizGenerator>) -> TestApp {
    spawn_app_with_pool(test_pool().await, generator).await
}

pub async fn spawn_app_with_pool(pool: SqlitePool, generator: Arc<dyn QuizGenerator>) -> TestApp {
    let state = AppState {
        pool: pool.clone(),
        config: test_config(),
        generator,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp { address, pool }
}

pub async fn seed_course(pool: &SqlitePool, instructor_id: i64, title: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO courses (instructor_id, title) VALUES (?, ?) RETURNING id")
        .bind(instructor_id)
        .bind(title)
        .fetch_one(pool)
        .await
        .expect("Failed to seed course")
}

pub async fn seed_lesson(pool: &SqlitePool, course_id: i64, content: &str) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO lessons (course_id, title, content) VALUES (?, 'Lesson', ?) RETURNING id",
    )
    .bind(course_id)
    .bind(content)
    .fetch_one(pool)
    .await
    .expect("Failed to seed lesson")
}

/// Inserts a bank with an explicit id.
pub async fn seed_bank(pool: &SqlitePool, id: i64, course_id: i64, lesson_id: Option<i64>) {
    sqlx::query("INSERT INTO question_banks (id, course_id, lesson_id, name) VALUES (?, ?, ?, 'Bank')")
        .bind(id)
        .bind(course_id)
        .bind(lesson_id)
        .execute(pool)
        .await
        .expect("Failed to seed question bank");
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
