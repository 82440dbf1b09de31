// src/main.rs

use std::{sync::Arc, time::Duration};

use learnhub::ai::{DisabledQuizGenerator, OpenAiQuizGenerator, QuizGenerator};
use learnhub::config::Config;
use learnhub::db;
use learnhub::routes;
use learnhub::state::AppState;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load configuration from environment (.env included)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    let connect_options = db::connect_options(&config.database_url)
        .expect("DATABASE_URL is not a valid SQLite URL");

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(connect_options.clone())
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations applied successfully.");

    let generator: Arc<dyn QuizGenerator> = match &config.ai.api_key {
        Some(key) => {
            let generator = OpenAiQuizGenerator::new(&config.ai, key.clone())
                .expect("Failed to build AI client");
            tracing::info!(
                "Quiz generator: {} via {}",
                config.ai.model,
                config.ai.api_base_url
            );
            Arc::new(generator)
        }
        None => {
            tracing::warn!("AI_API_KEY not set, AI quiz generation is disabled");
            Arc::new(DisabledQuizGenerator)
        }
    };

    let state = AppState {
        pool,
        config: config.clone(),
        generator,
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {}: {}", config.bind_addr, e));
    tracing::info!("Listening on {}", config.bind_addr);

    // Start the server
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
