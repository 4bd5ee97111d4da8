use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::{EmbedError, Embedder};

pub const DEFAULT_MODEL: &str = "all-MiniLM-L6-v2";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for an OpenAI-compatible embeddings endpoint
/// (text-embeddings-inference, vLLM, Ollama, OpenAI itself).
///
/// One request per text. No retries: a failure surfaces to the caller.
#[derive(Clone)]
pub struct RemoteEmbedder {
    client: Client,
    url: String,
    model: String,
    api_key: Option<String>,
}

impl RemoteEmbedder {
    pub fn new(url: String, model: String, api_key: Option<String>) -> Result<Self, EmbedError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            url,
            model,
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let mut request = self.client.post(&self.url).json(&EmbeddingRequest {
            model: &self.model,
            input: text,
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(EmbedError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let vector = parse_embedding(&body)?;
        debug!(dimension = vector.len(), model = %self.model, "embedding received");
        Ok(vector)
    }
}

fn parse_embedding(body: &str) -> Result<Vec<f32>, EmbedError> {
    let parsed: EmbeddingResponse = serde_json::from_str(body)?;
    parsed
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .filter(|v| !v.is_empty())
        .ok_or(EmbedError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedding_takes_first_vector() {
        let body = r#"{"object": "list", "data": [{"index": 0, "embedding": [0.1, 0.2]}]}"#;
        assert_eq!(parse_embedding(body).unwrap(), vec![0.1, 0.2]);
    }

    #[test]
    fn test_parse_embedding_empty_data_is_error() {
        let err = parse_embedding(r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, EmbedError::EmptyResponse));
    }

    #[test]
    fn test_parse_embedding_empty_vector_is_error() {
        assert!(parse_embedding(r#"{"data": [{"embedding": []}]}"#).is_err());
    }

    #[test]
    fn test_parse_embedding_bad_json_is_parse_error() {
        let err = parse_embedding("not json").unwrap_err();
        assert!(matches!(err, EmbedError::Parse(_)));
    }

    #[test]
    fn test_request_serializes_model_and_input() {
        let req = EmbeddingRequest {
            model: DEFAULT_MODEL,
            input: "hello",
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "all-MiniLM-L6-v2");
        assert_eq!(json["input"], "hello");
    }
}
