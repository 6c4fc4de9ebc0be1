#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use api::{build_router, AppState};
use async_trait::async_trait;
use axum_test::TestServer;
use database::Database;
use deadpool_postgres::{Manager, ManagerConfig, RecyclingMethod};
use inference_providers::MockProvider;
use services::chat::tools::WeatherTool;
use services::chat::ToolRegistry;
use services::retrieval::{
    EmbeddingProvider, IndexPoint, RetrievalError, ScoredPoint, VectorIndex,
};
use services::{ChatStreamService, IngestService, RetrievalService};

/// Embedder returning a fixed vector, no network involved
pub struct FixedEmbedder;

#[async_trait]
impl EmbeddingProvider for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, RetrievalError> {
        Ok(vec![0.25, 0.5, 0.75])
    }
}

/// In-memory vector index with scripted query results and recorded writes
#[derive(Default)]
pub struct ScriptedIndex {
    hits: Mutex<Vec<ScoredPoint>>,
    fail_queries: Mutex<bool>,
    pub collections: Mutex<Vec<String>>,
    pub upserts: Mutex<Vec<(String, Vec<IndexPoint>)>>,
}

impl ScriptedIndex {
    pub fn with_hits(hits: Vec<ScoredPoint>) -> Self {
        Self {
            hits: Mutex::new(hits),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_queries: Mutex::new(true),
            ..Default::default()
        }
    }
}

#[async_trait]
impl VectorIndex for ScriptedIndex {
    async fn ensure_collection(&self, collection: &str) -> Result<(), RetrievalError> {
        self.collections
            .lock()
            .unwrap()
            .push(collection.to_string());
        Ok(())
    }

    async fn upsert(
        &self,
        collection: &str,
        points: Vec<IndexPoint>,
    ) -> Result<(), RetrievalError> {
        self.upserts
            .lock()
            .unwrap()
            .push((collection.to_string(), points));
        Ok(())
    }

    async fn query(
        &self,
        _collection: &str,
        _vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, RetrievalError> {
        if *self.fail_queries.lock().unwrap() {
            return Err(RetrievalError::IndexFailed("scripted failure".to_string()));
        }
        Ok(self.hits.lock().unwrap().iter().take(limit).cloned().collect())
    }
}

/// Lazily connecting pool; the handlers under test never touch the database
fn lazy_database() -> Arc<Database> {
    let mut pg = tokio_postgres::Config::new();
    pg.host("127.0.0.1")
        .port(5432)
        .dbname("unused")
        .user("unused")
        .password("unused");
    let manager = Manager::from_config(
        pg,
        tokio_postgres::NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );
    let pool = deadpool_postgres::Pool::builder(manager)
        .max_size(1)
        .build()
        .expect("pool builder");
    Arc::new(Database::new(pool))
}

/// Build a test server around a scripted provider and vector index
pub fn setup_server(index: Arc<ScriptedIndex>) -> (TestServer, Arc<MockProvider>) {
    let provider = Arc::new(MockProvider::new());
    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(WeatherTool::new()));
    let embedder = Arc::new(FixedEmbedder);

    let state = AppState {
        chat: Arc::new(ChatStreamService::new(provider.clone(), Arc::new(tools))),
        retrieval: Arc::new(RetrievalService::new(embedder.clone(), index.clone())),
        ingest: Arc::new(IngestService::new(embedder, index)),
        db: lazy_database(),
        chat_model: "gemini-2.0-flash".to_string(),
        contextual_model: "gemini-2.5-flash".to_string(),
    };

    let server = TestServer::new(build_router(state)).expect("test server");
    (server, provider)
}

pub fn setup_default_server() -> (TestServer, Arc<MockProvider>) {
    setup_server(Arc::new(ScriptedIndex::default()))
}

/// Parse the JSON events out of an SSE body, skipping the `[DONE]` marker
pub fn parse_sse_events(body: &str) -> Vec<serde_json::Value> {
    body.split("\n\n")
        .filter_map(|frame| frame.trim().strip_prefix("data: "))
        .filter(|payload| *payload != "[DONE]")
        .map(|payload| serde_json::from_str(payload).expect("event JSON"))
        .collect()
}

pub fn event_types(events: &[serde_json::Value]) -> Vec<String> {
    events
        .iter()
        .map(|e| e["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
