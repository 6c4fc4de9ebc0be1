//! Request and response DTOs

use serde::{Deserialize, Serialize};
use services::chat::ClientMessage;

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ClientMessage>,
}

impl ChatRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.messages.is_empty() {
            return Err("messages must not be empty".to_string());
        }
        Ok(())
    }
}

/// Query parameters shared by the streaming endpoints
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StreamQuery {
    pub protocol: Option<String>,
}

impl StreamQuery {
    /// Caller's protocol choice, defaulting to the data protocol
    pub fn protocol(&self) -> &str {
        self.protocol.as_deref().unwrap_or("data")
    }
}

/// Body of `POST /api/contextual-query`
#[derive(Debug, Clone, Deserialize)]
pub struct ContextualQueryRequest {
    pub company_id: String,
    pub task: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub session_id: Option<uuid::Uuid>,
}

impl ContextualQueryRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.company_id.trim().is_empty() {
            return Err("company_id must not be empty".to_string());
        }
        if self.task.trim().is_empty() {
            return Err("task must not be empty".to_string());
        }
        Ok(())
    }
}

/// Query parameters of the chat-history endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ChatHistoryQuery {
    pub company_id: Option<String>,
    pub limit: Option<i64>,
}

impl ChatHistoryQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// Body of `POST /api/companies/{company_id}/ingest`
#[derive(Debug, Clone, Deserialize)]
pub struct IngestRequest {
    pub items: Vec<serde_json::Value>,
}

impl IngestRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.items.is_empty() {
            return Err("items must not be empty".to_string());
        }
        Ok(())
    }
}

/// Error body returned by non-streaming endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_request_rejects_empty_messages() {
        let request = ChatRequest { messages: vec![] };
        assert!(request.validate().is_err());
    }

    #[test]
    fn stream_query_defaults_to_data() {
        assert_eq!(StreamQuery::default().protocol(), "data");
        let query = StreamQuery {
            protocol: Some("text".to_string()),
        };
        assert_eq!(query.protocol(), "text");
    }

    #[test]
    fn contextual_request_requires_fields() {
        let request = ContextualQueryRequest {
            company_id: " ".to_string(),
            task: "do something".to_string(),
            user_id: None,
            session_id: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn history_limit_is_clamped() {
        let query = ChatHistoryQuery {
            company_id: None,
            limit: Some(1000),
        };
        assert_eq!(query.limit(), 100);
        assert_eq!(ChatHistoryQuery::default().limit(), 20);
    }
}
