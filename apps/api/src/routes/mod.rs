pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/health", get(health::health_handler))
        .route("/match", post(handlers::handle_match))
        .with_state(state)
}
