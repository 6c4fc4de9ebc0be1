//! Ollama embedding client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::ports::{EmbeddingProvider, RetrievalError};

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

pub struct OllamaEmbedder {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaEmbedder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let url = format!("{}/api/embeddings", self.base_url);
        let response = self
            .client
            .post(&url)
            .timeout(Duration::from_secs(60))
            .json(&EmbeddingRequest {
                model: &self.model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?
            .error_for_status()
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::EmbeddingFailed(e.to_string()))?;
        Ok(body.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn posts_model_and_prompt() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/embeddings")
                .json_body(json!({"model": "nomic-embed-text", "prompt": "hello"}));
            then.status(200).json_body(json!({"embedding": [0.1, 0.2]}));
        });

        let embedder = OllamaEmbedder::new(server.base_url(), "nomic-embed-text");
        let vector = embedder.embed("hello").await.unwrap();

        mock.assert();
        assert_eq!(vector, vec![0.1, 0.2]);
    }

    #[tokio::test]
    async fn backend_failure_is_reported() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/embeddings");
            then.status(500);
        });

        let embedder = OllamaEmbedder::new(server.base_url(), "nomic-embed-text");
        let err = embedder.embed("hello").await.unwrap_err();
        assert!(matches!(err, RetrievalError::EmbeddingFailed(_)));
    }
}
