pub mod chat;
pub mod ingest;
pub mod retrieval;

pub use chat::service::ChatStreamService;
pub use ingest::IngestService;
pub use retrieval::RetrievalService;
