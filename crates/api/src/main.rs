use std::sync::Arc;

use api::{build_router, AppState};
use config::{ApiConfig, LoggingConfig};
use database::Database;
use inference_providers::GeminiProvider;
use services::chat::tools::WeatherTool;
use services::chat::ToolRegistry;
use services::retrieval::{OllamaEmbedder, QdrantHttpIndex};
use services::{ChatStreamService, IngestService, RetrievalService};

#[tokio::main]
async fn main() {
    // Load configuration first to get logging settings
    let config = ApiConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Application cannot start without a valid configuration.");
        std::process::exit(1);
    });

    init_tracing(&config.logging);

    let db = Arc::new(Database::from_config(&config.database).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to connect to the database");
        std::process::exit(1);
    }));

    if let Err(e) = db.run_migrations().await {
        tracing::error!(error = %e, "Failed to run migrations");
        std::process::exit(1);
    }

    if let Err(e) = db.companies.seed_demo_companies().await {
        tracing::error!(error = %e, "Failed to seed demo companies");
        std::process::exit(1);
    }

    let provider = Arc::new(GeminiProvider::new(
        config.gemini.base_url.clone(),
        config.gemini.api_key.clone(),
    ));

    let mut tools = ToolRegistry::new();
    tools.register(Arc::new(WeatherTool::new()));
    let tools = Arc::new(tools);

    let embedder = Arc::new(OllamaEmbedder::new(
        config.ollama.url.clone(),
        config.ollama.embedding_model.clone(),
    ));
    let index = Arc::new(QdrantHttpIndex::new(config.qdrant.url.clone()));

    let state = AppState {
        chat: Arc::new(ChatStreamService::new(provider, tools)),
        retrieval: Arc::new(RetrievalService::new(embedder.clone(), index.clone())),
        ingest: Arc::new(IngestService::new(embedder, index)),
        db,
        chat_model: config.gemini.chat_model.clone(),
        contextual_model: config.gemini.contextual_model.clone(),
    };

    let app = build_router(state);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to bind {}", bind_address);
            std::process::exit(1);
        });

    tracing::info!("Chat API listening on {}", bind_address);
    tracing::info!("  POST /api/chat                - streaming chat with tools");
    tracing::info!("  POST /api/contextual-query    - retrieval-augmented advice");
    tracing::info!("  GET  /api/companies           - company listing");
    tracing::info!("  GET  /api/health              - health check");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

fn init_tracing(logging_config: &LoggingConfig) {
    // Build the filter string from the logging configuration
    let mut filter = logging_config.level.clone();

    for (module, level) in &logging_config.modules {
        filter.push_str(&format!(",{}={}", module, level));
    }

    // Initialize tracing based on the format specified in config
    match logging_config.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .init();
        }
        "compact" => {
            tracing_subscriber::fmt()
                .compact()
                .with_env_filter(filter)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .pretty()
                .with_env_filter(filter)
                .init();
        }
    }
}
