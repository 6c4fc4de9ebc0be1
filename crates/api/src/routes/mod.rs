pub mod chat;
pub mod common;
pub mod companies;
pub mod contextual;
pub mod health;
pub mod ingest;
pub mod sessions;

use axum::routing::{get, post};
use axum::Router;
use database::Database;
use services::{ChatStreamService, IngestService, RetrievalService};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatStreamService>,
    pub retrieval: Arc<RetrievalService>,
    pub ingest: Arc<IngestService>,
    pub db: Arc<Database>,
    pub chat_model: String,
    pub contextual_model: String,
}

/// Build the API router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat::stream_chat))
        .route("/api/contextual-query", post(contextual::contextual_query))
        .route(
            "/api/users/{user_id}/chat-history",
            get(sessions::chat_history),
        )
        .route("/api/sessions/{session_id}", get(sessions::get_session))
        .route(
            "/api/sessions/{session_id}/messages",
            get(sessions::get_session_messages),
        )
        .route("/api/companies", get(companies::list_companies))
        .route("/api/companies/{company_id}", get(companies::get_company))
        .route(
            "/api/companies/{company_id}/ingest",
            post(ingest::ingest_company_data),
        )
        .route("/api/health", get(health::health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
