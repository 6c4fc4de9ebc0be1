//! Mock implementation of GenerationProvider for testing
//!
//! This module provides a scripted provider that replays pre-built chunk
//! sequences without requiring a live Gemini backend. Tests script exact
//! upstream behavior (text fragments, function-call snapshots, faults) and
//! assert on what was requested.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream;
use serde_json::json;
use tokio::sync::Mutex;

use crate::models::{
    Candidate, Content, FunctionCall, GenerationChunk, GenerationError, GenerationRequest, Part,
    UsageMetadata,
};
use crate::{GenerationProvider, StreamingResult};

type Script = Vec<Result<GenerationChunk, GenerationError>>;

/// Scripted provider: each `stream_generate` call replays the next enqueued
/// script. When no script is queued, a one-line text response is produced so
/// incidental calls in tests do not hang.
#[derive(Clone, Default)]
pub struct MockProvider {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    requests: Arc<Mutex<Vec<(String, GenerationRequest)>>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a chunk sequence for the next call
    pub async fn enqueue(&self, script: Script) {
        self.scripts.lock().await.push_back(script);
    }

    /// All requests seen so far, in call order
    pub async fn recorded_requests(&self) -> Vec<(String, GenerationRequest)> {
        self.requests.lock().await.clone()
    }

    /// A chunk carrying a single text fragment
    pub fn text_chunk(text: &str) -> GenerationChunk {
        GenerationChunk::with_parts(vec![Part::text(text)])
    }

    /// A chunk carrying one function-call fragment
    pub fn function_call_chunk(
        id: Option<&str>,
        name: &str,
        args: serde_json::Value,
    ) -> GenerationChunk {
        GenerationChunk::with_parts(vec![Part::function_call(FunctionCall {
            id: id.map(str::to_string),
            name: name.to_string(),
            args,
        })])
    }

    /// A terminal chunk with a finish reason and optional usage metadata
    pub fn finish_chunk(reason: &str, usage: Option<UsageMetadata>) -> GenerationChunk {
        GenerationChunk {
            candidates: vec![Candidate {
                content: None,
                finish_reason: Some(reason.to_string()),
            }],
            usage_metadata: usage,
        }
    }

    fn default_script() -> Script {
        vec![
            Ok(Self::text_chunk("This is a mock response.")),
            Ok(Self::finish_chunk(
                "STOP",
                Some(UsageMetadata {
                    prompt_token_count: 8,
                    candidates_token_count: 6,
                    total_token_count: Some(14),
                }),
            )),
        ]
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn stream_generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<StreamingResult, GenerationError> {
        self.requests
            .lock()
            .await
            .push((model.to_string(), request));

        let script = self
            .scripts
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(Self::default_script);

        Ok(Box::pin(stream::iter(script)))
    }
}

/// Convenience for scripting a function-response echo in assertions
pub fn function_args(pairs: &[(&str, serde_json::Value)]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, value) in pairs {
        map.insert(key.to_string(), value.clone());
    }
    json!(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn replays_scripts_in_order() {
        let provider = MockProvider::new();
        provider
            .enqueue(vec![Ok(MockProvider::text_chunk("first"))])
            .await;
        provider
            .enqueue(vec![Ok(MockProvider::text_chunk("second"))])
            .await;

        for expected in ["first", "second"] {
            let stream = provider
                .stream_generate("gemini-2.0-flash", GenerationRequest::default())
                .await
                .unwrap();
            let chunks: Vec<_> = stream.collect().await;
            let part = &chunks[0].as_ref().unwrap().candidates[0]
                .content
                .as_ref()
                .unwrap()
                .parts[0];
            assert_eq!(part.text.as_deref(), Some(expected));
        }
    }

    #[tokio::test]
    async fn records_requests() {
        let provider = MockProvider::new();
        let request = GenerationRequest {
            contents: vec![Content::user(vec![Part::text("hi")])],
            ..Default::default()
        };
        provider
            .stream_generate("gemini-2.5-flash", request)
            .await
            .unwrap();

        let recorded = provider.recorded_requests().await;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "gemini-2.5-flash");
        assert_eq!(recorded[0].1.contents.len(), 1);
    }

    #[tokio::test]
    async fn falls_back_to_default_script() {
        let provider = MockProvider::new();
        let stream = provider
            .stream_generate("gemini-2.0-flash", GenerationRequest::default())
            .await
            .unwrap();
        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks.len(), 2);
        assert_eq!(
            chunks[1].as_ref().unwrap().candidates[0]
                .finish_reason
                .as_deref(),
            Some("STOP")
        );
    }
}
