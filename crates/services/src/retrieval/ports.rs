//! Ports for the retrieval stack
//!
//! The service layer talks to an embedding backend and a vector index only
//! through these traits; the HTTP clients live behind them and tests swap in
//! scripted implementations.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("Embedding request failed: {0}")]
    EmbeddingFailed(String),
    #[error("Vector index request failed: {0}")]
    IndexFailed(String),
    #[error("Vector index returned HTTP {status_code}: {message}")]
    IndexHttpError { status_code: u16, message: String },
}

/// One stored or retrieved point
#[derive(Debug, Clone)]
pub struct IndexPoint {
    pub id: String,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

/// A search hit with its payload
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    pub score: f32,
    pub payload: serde_json::Value,
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a text into the index's vector space
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Create the collection if it does not exist yet
    async fn ensure_collection(&self, collection: &str) -> Result<(), RetrievalError>;

    /// Upsert points into a collection
    async fn upsert(&self, collection: &str, points: Vec<IndexPoint>) -> Result<(), RetrievalError>;

    /// Nearest-neighbor query, best matches first
    async fn query(
        &self,
        collection: &str,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, RetrievalError>;
}
