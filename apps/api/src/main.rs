mod config;
mod embedding;
mod errors;
mod matching;
mod nlp;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::embedding::build_embedder;
use crate::matching::{MatchEngine, Vocabulary};
use crate::nlp::{RemoteAnnotator, RuleAnnotator, TextAnnotator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    let embedder = build_embedder(&config).await?;
    info!(
        "Embedder initialized ({}, requested: {})",
        embedder.name(),
        config.embedder_backend.as_str()
    );

    let annotator = build_annotator(&config)?;
    info!("Annotator initialized ({})", annotator.name());

    let vocabulary = match &config.vocabulary_path {
        Some(path) => {
            let vocab = Vocabulary::from_file(path)
                .with_context(|| format!("Failed to load vocabulary from {}", path.display()))?;
            info!("Vocabulary loaded from {}", path.display());
            vocab
        }
        None => Vocabulary::default(),
    };

    let engine = MatchEngine::new(embedder, annotator, Arc::new(vocabulary));

    // Build app state
    let state = AppState::new(config.clone(), engine);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Remote parser when `ANNOTATOR_URL` is set, rule annotator otherwise.
fn build_annotator(config: &Config) -> Result<Arc<dyn TextAnnotator>> {
    match &config.annotator_url {
        Some(url) => {
            let annotator =
                RemoteAnnotator::new(url.clone()).context("Failed to build annotator client")?;
            Ok(Arc::new(annotator))
        }
        None => Ok(Arc::new(RuleAnnotator)),
    }
}
