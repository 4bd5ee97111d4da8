//! Text embedding — the semantic-similarity boundary.
//!
//! Backends:
//! - `FastEmbedder` (`fastembed` feature, default when compiled in):
//!   all-MiniLM-L6-v2 in-process.
//! - `HashEmbedder`: feature hashing, deterministic, no model files. The
//!   offline fallback when the local model is missing or fails to load.
//! - `RemoteEmbedder`: OpenAI-compatible `/embeddings` endpoint serving a
//!   sentence-transformer model.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{Config, EmbedderBackend};

pub mod hashing;
#[cfg(feature = "fastembed")]
pub mod local;
pub mod remote;

pub use hashing::HashEmbedder;
#[cfg(feature = "fastembed")]
pub use local::FastEmbedder;
pub use remote::RemoteEmbedder;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Embedding service returned no vectors")]
    EmptyResponse,

    #[error("Embedding model error: {0}")]
    Model(String),
}

#[async_trait]
pub trait Embedder: Send + Sync {
    /// Backend label, reported by `/health`.
    fn name(&self) -> &'static str;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Builds the configured backend. A local model that is not compiled in or
/// fails to load degrades to the hash embedder instead of failing startup.
pub async fn build_embedder(config: &Config) -> anyhow::Result<Arc<dyn Embedder>> {
    match config.embedder_backend {
        EmbedderBackend::Remote => {
            let url = config
                .embedder_url
                .clone()
                .context("EMBEDDER_URL is required for the remote embedder")?;
            let embedder = RemoteEmbedder::new(
                url.clone(),
                config.embedder_model.clone(),
                config.embedder_api_key.clone(),
            )
            .context("Failed to build embeddings client")?;
            info!("Using embeddings endpoint {url} (model: {})", embedder.model());
            Ok(Arc::new(embedder))
        }
        EmbedderBackend::Local => match load_local(config).await {
            Ok(embedder) => Ok(embedder),
            Err(e) => {
                warn!("Local embedding model unavailable ({e}); falling back to hash embedder");
                Ok(Arc::new(HashEmbedder::new(config.embedding_dim)))
            }
        },
        EmbedderBackend::Hash => Ok(Arc::new(HashEmbedder::new(config.embedding_dim))),
    }
}

#[cfg(feature = "fastembed")]
async fn load_local(config: &Config) -> Result<Arc<dyn Embedder>, EmbedError> {
    let cache_dir = config.model_cache_dir.clone();
    let embedder = tokio::task::spawn_blocking(move || FastEmbedder::load(cache_dir))
        .await
        .map_err(|e| EmbedError::Model(format!("model loader failed: {e}")))??;
    info!("Loaded all-MiniLM-L6-v2 in-process");
    Ok(Arc::new(embedder))
}

#[cfg(not(feature = "fastembed"))]
async fn load_local(_config: &Config) -> Result<Arc<dyn Embedder>, EmbedError> {
    Err(EmbedError::Model(
        "built without the `fastembed` feature".to_string(),
    ))
}

/// Cosine similarity in [-1, 1].
///
/// Zero-norm vectors and dimension mismatches yield 0.0; the latter is logged
/// since it means two different models were mixed.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}


#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_build_embedder_honours_backend() {
        let hash = build_embedder(&config(&[("EMBEDDER_BACKEND", "hash")]))
            .await
            .unwrap();
        assert_eq!(hash.name(), "hash");

        let remote = build_embedder(&config(&[(
            "EMBEDDER_URL",
            "http://localhost:8000/v1/embeddings",
        )]))
        .await
        .unwrap();
        assert_eq!(remote.name(), "remote");
    }

    #[cfg(not(feature = "fastembed"))]
    #[tokio::test]
    async fn test_local_backend_falls_back_to_hash_when_not_compiled_in() {
        let embedder = build_embedder(&config(&[("EMBEDDER_BACKEND", "local")]))
            .await
            .unwrap();
        assert_eq!(embedder.name(), "hash");
        assert_eq!(embedder.embed("python").await.unwrap().len(), 384);
    }

    #[test]
    fn test_identical_vectors_score_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposite_vectors_score_minus_one() {
        let sim = cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]);
        assert!((sim + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_vectors_score_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 5.0]), 0.0);
    }

    #[test]
    fn test_magnitude_is_ignored() {
        let sim = cosine_similarity(&[1.0, 1.0], &[10.0, 10.0]);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_scores_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
