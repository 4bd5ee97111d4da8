use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the active embedder and annotator backends.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-match-api",
        "embedder": state.engine.embedder_name(),
        "annotator": state.engine.annotator_name()
    }))
}
