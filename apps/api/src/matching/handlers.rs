//! Axum route handlers for the Match API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::matching::fusion::WeightConfig;
use crate::matching::ranking::{Ranking, ResumeRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub jd: Option<String>,
    pub resumes: Option<Vec<ResumeRecord>>,
    /// All five keys or nothing.
    pub weights: Option<WeightConfig>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Self-describing index of the API.
pub async fn handle_index() -> Json<Value> {
    Json(json!({
        "message": "Resume Matching API",
        "endpoints": {
            "/health": "GET - Health check endpoint",
            "/match": "POST - Match resumes against job description"
        },
        "example_request": {
            "url": "/match",
            "method": "POST",
            "body": {
                "jd": "Job description text",
                "resumes": [
                    {"id": 1, "name": "Candidate A", "text": "Resume 1 text"},
                    "Resume 2 text"
                ]
            }
        }
    }))
}

/// POST /match
///
/// Ranks the submitted resumes against the job description, best first.
/// Caller-supplied weights are validated and normalized per group; without
/// them the configured defaults apply.
pub async fn handle_match(
    State(state): State<AppState>,
    payload: Result<Json<MatchRequest>, JsonRejection>,
) -> Result<Json<Ranking>, AppError> {
    let Json(request) =
        payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let weights = match request.weights {
        Some(weights) => {
            weights.validate()?;
            weights.normalized()
        }
        None => state.default_weights,
    };

    let jd = request.jd.unwrap_or_default();
    let resumes = request.resumes.unwrap_or_default();

    let ranking = state.engine.rank(&jd, &resumes, &weights).await?;

    Ok(Json(ranking))
}
