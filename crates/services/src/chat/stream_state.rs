//! Per-request stream state
//!
//! This module holds the state that lives for exactly one streaming request:
//! the session bookkeeping (message id, open text segment, captured finish
//! data), the tool-call aggregator, and the emitter that pushes frames into
//! the response channel.

use futures::channel::mpsc::UnboundedSender;
use indexmap::IndexMap;
use inference_providers::{FunctionCall, UsageMetadata};
use thiserror::Error;
use uuid::Uuid;

use super::events::{StreamFrame, UiMessageEvent};

/// The single text segment id used per message
pub const TEXT_STREAM_ID: &str = "text-1";

/// How argument fragments for the same call id combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Each fragment carries a complete snapshot; the last one wins
    ReplaceSnapshot,
    /// Fragments are pieces of raw argument text, concatenated in order
    AppendText,
}

/// One tool call collected during the streaming phase
#[derive(Debug, Clone)]
pub struct ToolCallRecord {
    pub call_id: String,
    pub name: String,
    snapshot: serde_json::Value,
    text: String,
}

impl ToolCallRecord {
    /// Final merged input for execution
    pub fn into_input(self, policy: MergePolicy) -> serde_json::Value {
        match policy {
            MergePolicy::ReplaceSnapshot => self.snapshot,
            // Appended text should be a JSON document once complete; if it
            // is not, hand the raw text to the tool as a string
            MergePolicy::AppendText => serde_json::from_str(&self.text)
                .unwrap_or(serde_json::Value::String(self.text)),
        }
    }
}

/// What one observed fragment means for event emission
#[derive(Debug, Clone)]
pub struct CallObservation {
    pub call_id: String,
    pub tool_name: String,
    pub first_seen: bool,
    /// Serialized argument fragment for the `tool-input-delta` event
    pub input_delta: String,
}

/// Collects function-call fragments keyed by call id
///
/// Records keep first-observation order, which is also drain order. When the
/// upstream supplies no call id the fragment is keyed by function name (so
/// snapshots of the same call merge) and a local id is minted.
pub struct ToolCallAggregator {
    policy: MergePolicy,
    records: IndexMap<String, ToolCallRecord>,
}

impl ToolCallAggregator {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            records: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Fold one fragment into the record set
    pub fn observe(&mut self, call: &FunctionCall) -> CallObservation {
        let key = call
            .id
            .clone()
            .unwrap_or_else(|| call.name.clone());
        let first_seen = !self.records.contains_key(&key);

        let record = self.records.entry(key).or_insert_with(|| ToolCallRecord {
            call_id: call
                .id
                .clone()
                .unwrap_or_else(|| format!("call-{}", Uuid::new_v4().simple())),
            name: call.name.clone(),
            snapshot: serde_json::Value::Null,
            text: String::new(),
        });

        let input_delta = match self.policy {
            MergePolicy::ReplaceSnapshot => {
                record.snapshot = call.args.clone();
                serde_json::to_string(&call.args).unwrap_or_else(|_| "{}".to_string())
            }
            MergePolicy::AppendText => {
                let fragment = match &call.args {
                    serde_json::Value::String(s) => s.clone(),
                    other => serde_json::to_string(other).unwrap_or_default(),
                };
                record.text.push_str(&fragment);
                fragment
            }
        };

        CallObservation {
            call_id: record.call_id.clone(),
            tool_name: record.name.clone(),
            first_seen,
            input_delta,
        }
    }

    /// Consume the aggregator, yielding records in first-observation order
    pub fn drain(self) -> Vec<(ToolCallRecord, MergePolicy)> {
        let policy = self.policy;
        self.records
            .into_iter()
            .map(|(_, record)| (record, policy))
            .collect()
    }
}

/// Session-scoped bookkeeping for one streamed message
pub struct StreamSession {
    pub message_id: String,
    pub text_started: bool,
    pub text_finished: bool,
    pub finish_reason: Option<String>,
    pub usage: Option<UsageMetadata>,
    pub tool_calls: ToolCallAggregator,
}

impl StreamSession {
    pub fn new(policy: MergePolicy) -> Self {
        Self {
            message_id: format!("msg-{}", Uuid::new_v4().simple()),
            text_started: false,
            text_finished: false,
            finish_reason: None,
            usage: None,
            tool_calls: ToolCallAggregator::new(policy),
        }
    }
}

#[derive(Error, Debug)]
#[error("Downstream channel closed")]
pub struct EmitError;

/// Helper for emitting stream frames
pub struct EventEmitter {
    tx: UnboundedSender<StreamFrame>,
}

impl EventEmitter {
    pub fn new(tx: UnboundedSender<StreamFrame>) -> Self {
        Self { tx }
    }

    /// Emit one protocol event. Failure means the client went away.
    pub fn emit(&self, event: UiMessageEvent) -> Result<(), EmitError> {
        self.tx
            .unbounded_send(StreamFrame::Event(event))
            .map_err(|_| EmitError)
    }

    /// Emit the terminal marker
    pub fn done(&self) -> Result<(), EmitError> {
        self.tx.unbounded_send(StreamFrame::Done).map_err(|_| EmitError)
    }
}
