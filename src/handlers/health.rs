use axum::{Json, extract::State};
use serde_json::{Value, json};
use tracing::error;

use crate::error::BootstrapError;
use crate::router::AppState;

/// GET /healthz -> `{"status":"ok"}` once the database answers.
pub async fn healthz_handler(State(state): State<AppState>) -> Result<Json<Value>, BootstrapError> {
    sqlx::query("SELECT 1")
        .execute(&state.pool)
        .await
        .inspect_err(|e| error!(error = %e, "health check query failed"))?;
    Ok(Json(json!({ "status": "ok" })))
}
