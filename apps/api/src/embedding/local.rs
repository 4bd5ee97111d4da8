//! FastEmbedder: all-MiniLM-L6-v2 run in-process through fastembed
//! (ONNX Runtime). Produces 384-dimensional, L2-normalized vectors.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::embedding::{EmbedError, Embedder};

#[derive(Clone)]
pub struct FastEmbedder {
    // Inference needs exclusive access to the ONNX session.
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedder {
    /// Loads the model, downloading it into `cache_dir` on first use.
    /// Blocking; call from `spawn_blocking` inside the runtime.
    pub fn load(cache_dir: Option<PathBuf>) -> Result<Self, EmbedError> {
        let mut options =
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false);
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir);
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|e| EmbedError::Model(format!("failed to load all-MiniLM-L6-v2: {e}")))?;

        Ok(Self {
            model: Arc::new(Mutex::new(model)),
        })
    }
}

#[async_trait]
impl Embedder for FastEmbedder {
    fn name(&self) -> &'static str {
        "fastembed"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let model = Arc::clone(&self.model);
        let input = vec![text.to_string()];

        let mut vectors = tokio::task::spawn_blocking(move || {
            let mut model = model
                .lock()
                .map_err(|_| EmbedError::Model("embedding model lock poisoned".to_string()))?;
            model
                .embed(input, None)
                .map_err(|e| EmbedError::Model(e.to_string()))
        })
        .await
        .map_err(|e| EmbedError::Model(format!("embedding task failed: {e}")))??;

        debug!(chars = text.len(), "local embedding computed");

        vectors.pop().ok_or(EmbedError::EmptyResponse)
    }
}
