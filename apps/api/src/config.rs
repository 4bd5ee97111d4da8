use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::embedding::hashing::DEFAULT_DIMENSION;
use crate::embedding::remote::DEFAULT_MODEL;
use crate::matching::WeightConfig;

/// Which embedder serves the semantic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderBackend {
    /// all-MiniLM-L6-v2 in-process (requires the `fastembed` feature).
    Local,
    /// Feature hashing; always available.
    Hash,
    /// OpenAI-compatible endpoint at `EMBEDDER_URL`.
    Remote,
}

impl EmbedderBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedderBackend::Local => "local",
            EmbedderBackend::Hash => "hash",
            EmbedderBackend::Remote => "remote",
        }
    }
}

impl FromStr for EmbedderBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "fastembed" => Ok(EmbedderBackend::Local),
            "hash" => Ok(EmbedderBackend::Hash),
            "remote" => Ok(EmbedderBackend::Remote),
            other => bail!("EMBEDDER_BACKEND must be one of local, hash, remote (got '{other}')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub embedder_backend: EmbedderBackend,
    /// OpenAI-compatible embeddings endpoint; selects `Remote` when no backend is named.
    pub embedder_url: Option<String>,
    pub embedder_model: String,
    pub embedder_api_key: Option<String>,
    pub embedding_dim: usize,
    /// Where the local model is downloaded; fastembed's default when unset.
    pub model_cache_dir: Option<PathBuf>,
    /// Remote parser endpoint. Unset → built-in rule annotator.
    pub annotator_url: Option<String>,
    pub vocabulary_path: Option<PathBuf>,
    /// Default weights for requests that don't send their own.
    pub scoring_weights: WeightConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let scoring_weights = match var("SCORING_WEIGHTS") {
            Some(json) => {
                let weights: WeightConfig = serde_json::from_str(&json).context(
                    "SCORING_WEIGHTS must be a JSON object with all five weight keys",
                )?;
                weights.validate().context("SCORING_WEIGHTS is invalid")?;
                weights
            }
            None => WeightConfig::default(),
        };

        let embedder_url = var("EMBEDDER_URL");
        let embedder_backend = match var("EMBEDDER_BACKEND") {
            Some(name) => name.parse::<EmbedderBackend>()?,
            None if embedder_url.is_some() => EmbedderBackend::Remote,
            None if cfg!(feature = "fastembed") => EmbedderBackend::Local,
            None => EmbedderBackend::Hash,
        };
        if embedder_backend == EmbedderBackend::Remote && embedder_url.is_none() {
            bail!("EMBEDDER_BACKEND=remote requires EMBEDDER_URL");
        }

        Ok(Config {
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            embedder_backend,
            embedder_url,
            embedder_model: var("EMBEDDER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            embedder_api_key: var("EMBEDDER_API_KEY"),
            embedding_dim: match var("EMBEDDING_DIM") {
                Some(v) => v
                    .parse::<usize>()
                    .ok()
                    .filter(|d| *d > 0)
                    .with_context(|| format!("EMBEDDING_DIM must be a positive integer (got '{v}')"))?,
                None => DEFAULT_DIMENSION,
            },
            model_cache_dir: var("MODEL_CACHE_DIR").map(PathBuf::from),
            annotator_url: var("ANNOTATOR_URL"),
            vocabulary_path: var("VOCABULARY_PATH").map(PathBuf::from),
            scoring_weights,
        })
    }
}
