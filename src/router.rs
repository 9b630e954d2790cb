use axum::{Router, routing::get};

use crate::db::SqlitePool;
use crate::error::BootstrapError;
use crate::handlers::health::healthz_handler;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz_handler))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> BootstrapError {
    BootstrapError::NotFound
}
