//! Qdrant HTTP client implementing the vector-index port

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use super::ports::{IndexPoint, RetrievalError, ScoredPoint, VectorIndex};

/// Embedding dimensionality of the nomic-embed-text model
pub const VECTOR_SIZE: u64 = 768;

pub struct QdrantHttpIndex {
    client: reqwest::Client,
    base_url: String,
}

impl QdrantHttpIndex {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, RetrievalError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let status_code = status.as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|e| format!("Failed to read error response body: {e}"));
        Err(RetrievalError::IndexHttpError {
            status_code,
            message,
        })
    }

    fn points_from_body(body: serde_json::Value, path: &[&str]) -> Vec<ScoredPoint> {
        let mut node = &body;
        for key in path {
            node = node.get(key).unwrap_or(&serde_json::Value::Null);
        }
        node.as_array()
            .map(|points| {
                points
                    .iter()
                    .map(|p| ScoredPoint {
                        score: p.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0) as f32,
                        payload: p.get("payload").cloned().unwrap_or(json!({})),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl VectorIndex for QdrantHttpIndex {
    async fn ensure_collection(&self, collection: &str) -> Result<(), RetrievalError> {
        let exists = self
            .client
            .get(format!("{}/collections/{}", self.base_url, collection))
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| RetrievalError::IndexFailed(e.to_string()))?;

        if exists.status().is_success() {
            return Ok(());
        }

        let response = self
            .client
            .put(format!("{}/collections/{}", self.base_url, collection))
            .timeout(Duration::from_secs(30))
            .json(&json!({
                "vectors": {"size": VECTOR_SIZE, "distance": "Cosine"}
            }))
            .send()
            .await
            .map_err(|e| RetrievalError::IndexFailed(e.to_string()))?;
        Self::check(response).await?;
        tracing::info!(collection, "created vector collection");
        Ok(())
    }

    async fn upsert(&self, collection: &str, points: Vec<IndexPoint>) -> Result<(), RetrievalError> {
        if points.is_empty() {
            return Ok(());
        }

        let body = json!({
            "points": points
                .iter()
                .map(|p| json!({"id": p.id, "vector": p.vector, "payload": p.payload}))
                .collect::<Vec<_>>()
        });

        let response = self
            .client
            .put(format!(
                "{}/collections/{}/points?wait=true",
                self.base_url, collection
            ))
            .timeout(Duration::from_secs(60))
            .json(&body)
            .send()
            .await
            .map_err(|e| RetrievalError::IndexFailed(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, RetrievalError> {
        let response = self
            .client
            .post(format!(
                "{}/collections/{}/points/query",
                self.base_url, collection
            ))
            .timeout(Duration::from_secs(30))
            .json(&json!({
                "query": vector,
                "limit": limit,
                "with_payload": true
            }))
            .send()
            .await
            .map_err(|e| RetrievalError::IndexFailed(e.to_string()))?;
        let body: serde_json::Value = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| RetrievalError::IndexFailed(e.to_string()))?;

        Ok(Self::points_from_body(body, &["result", "points"]))
    }
}
