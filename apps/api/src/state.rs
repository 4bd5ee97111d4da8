use crate::config::Config;
use crate::matching::{MatchEngine, WeightConfig};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    #[allow(dead_code)]
    pub config: Config,
    /// Embedder, annotator and vocabulary, built once in `main`.
    pub engine: MatchEngine,
    /// Used when a request carries no `weights` object.
    pub default_weights: WeightConfig,
}

impl AppState {
    pub fn new(config: Config, engine: MatchEngine) -> Self {
        let default_weights = config.scoring_weights;
        Self {
            config,
            engine,
            default_weights,
        }
    }
}
