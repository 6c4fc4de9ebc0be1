//! Document ingestion
//!
//! Flattens free-form JSON records into searchable text, embeds them, and
//! upserts them into the company's vector collection with the payload shape
//! the retrieval side expects.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::retrieval::{
    collection_name, EmbeddingProvider, IndexPoint, RetrievalError, VectorIndex,
};

/// Payload `content` field is capped at this many characters
const CONTENT_PREVIEW_LIMIT: usize = 1000;

/// Outcome of one ingestion request
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub success: bool,
    pub company_id: String,
    pub items_ingested: usize,
    pub collection_name: String,
}

pub struct IngestService {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
}

impl IngestService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Ingest a batch of records into a company's collection
    ///
    /// Non-object records and records with no extractable text are skipped.
    pub async fn ingest(
        &self,
        company_id: &str,
        items: Vec<serde_json::Value>,
    ) -> Result<IngestReport, RetrievalError> {
        let collection = collection_name(company_id);
        self.index.ensure_collection(&collection).await?;

        let mut points = Vec::new();
        for item in items {
            if !item.is_object() {
                continue;
            }

            let content = extract_content(&item);
            if content.trim().is_empty() {
                continue;
            }

            let vector = self.embedder.embed(&content).await?;
            points.push(IndexPoint {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: json!({
                    "company_id": company_id,
                    "source": item.get("source").and_then(|v| v.as_str()).unwrap_or("custom"),
                    "sprint": item.get("sprint").cloned().unwrap_or(json!(0)),
                    "sprint_focus": item.get("sprint_focus").and_then(|v| v.as_str()).unwrap_or(""),
                    "bug_stage": item.get("bug_stage").and_then(|v| v.as_str()).unwrap_or(""),
                    "content": truncate_chars(&content, CONTENT_PREVIEW_LIMIT),
                    "full_data": item,
                }),
            });
        }

        let items_ingested = points.len();
        self.index.upsert(&collection, points).await?;

        tracing::info!(company_id, items_ingested, "ingested records");
        Ok(IngestReport {
            success: true,
            company_id: company_id.to_string(),
            items_ingested,
            collection_name: collection,
        })
    }
}

fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_value(parts: &mut Vec<String>, value: &serde_json::Value) {
    match value {
        serde_json::Value::Array(items) => {
            parts.extend(items.iter().map(value_to_text));
        }
        other => parts.push(value_to_text(other)),
    }
}

/// Flatten a record into the searchable text that gets embedded
///
/// Known scalar fields come first, then nested message/comment text, then
/// the insight lists; everything joined with " | ".
pub fn extract_content(item: &serde_json::Value) -> String {
    let mut parts: Vec<String> = Vec::new();

    for key in [
        "title",
        "thread_title",
        "description",
        "content",
        "message",
        "commit_hash",
    ] {
        if let Some(value) = item.get(key) {
            parts.push(value_to_text(value));
        }
    }

    if let Some(messages) = item.get("messages").and_then(|v| v.as_array()) {
        for message in messages {
            if let Some(text) = message.get("text").and_then(|v| v.as_str()) {
                parts.push(text.to_string());
            }
        }
    }

    if let Some(comments) = item.get("comments") {
        match comments {
            serde_json::Value::Array(entries) => {
                for comment in entries {
                    match comment.get("text").and_then(|v| v.as_str()) {
                        Some(text) => parts.push(text.to_string()),
                        None => parts.push(value_to_text(comment)),
                    }
                }
            }
            other => parts.push(value_to_text(other)),
        }
    }

    for key in ["action_items", "decisions_made"] {
        if let Some(value) = item.get(key) {
            push_value(&mut parts, value);
        }
    }

    for key in [
        "lessons_learned",
        "warnings",
        "key_decisions",
        "best_practices",
        "common_mistakes",
        "bug_related",
        "bug_clues",
        "bug_connection",
        "bug_mentions",
        "files_changed",
        "related_incidents",
        "tags",
    ] {
        if let Some(value) = item.get(key) {
            push_value(&mut parts, value);
        }
    }

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" | ")
}
