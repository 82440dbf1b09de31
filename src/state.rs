use std::sync::Arc;

use crate::{ai::QuizGenerator, config::Config};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub generator: Arc<dyn QuizGenerator>,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<dyn QuizGenerator> {
    fn from_ref(state: &AppState) -> Self {
        state.generator.clone()
    }
}
