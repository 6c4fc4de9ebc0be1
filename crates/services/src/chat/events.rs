//! Downstream UI message stream events
//!
//! The closed vocabulary of events the client protocol understands. The
//! `type` discriminator is kebab-case and field names are camelCase on the
//! wire; everything here serializes through serde, never by hand.

use serde::{Deserialize, Serialize};

/// One event in the UI message stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum UiMessageEvent {
    Start {
        message_id: String,
    },
    TextStart {
        id: String,
    },
    TextDelta {
        id: String,
        delta: String,
    },
    TextEnd {
        id: String,
    },
    ToolInputStart {
        tool_call_id: String,
        tool_name: String,
    },
    ToolInputDelta {
        tool_call_id: String,
        input_text_delta: String,
    },
    ToolInputAvailable {
        tool_call_id: String,
        tool_name: String,
        input: serde_json::Value,
    },
    ToolOutputAvailable {
        tool_call_id: String,
        output: serde_json::Value,
    },
    ToolOutputError {
        tool_call_id: String,
        error_text: String,
    },
    Finish {
        #[serde(skip_serializing_if = "Option::is_none")]
        message_metadata: Option<FinishMetadata>,
    },
}

/// Metadata attached to the terminal `finish` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsagePayload>,
}

/// Normalized token usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagePayload {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    /// Only present when the upstream reported a total; never derived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_tokens: Option<i64>,
}

/// One frame of the outgoing stream
///
/// The orchestrator owns the terminal marker: a stream that ends without a
/// `Done` frame (upstream fault) must close the connection without emitting
/// `data: [DONE]`.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamFrame {
    Event(UiMessageEvent),
    Done,
}
