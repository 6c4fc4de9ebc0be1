//! Chat stream orchestration
//!
//! One spawned task per request drives the upstream chunk stream and
//! translates it into the downstream event vocabulary: text fragments are
//! bracketed into a single text segment, function-call fragments are
//! aggregated and executed after the model stops streaming, and the captured
//! finish reason and usage close the message.
//!
//! The task owns the terminal marker. A normal run ends with a `Done` frame;
//! an upstream fault ends the stream without it, so the connection closes
//! without `data: [DONE]` and the client can tell the difference.

use std::sync::Arc;

use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::oneshot;

use inference_providers::{
    Content, GenerationError, GenerationProvider, GenerationRequest, Part,
};

use super::events::{StreamFrame, UiMessageEvent};
use super::finish::build_finish_metadata;
use super::prompt::{convert_to_contents, ClientMessage};
use super::stream_state::{
    EmitError, EventEmitter, MergePolicy, StreamSession, TEXT_STREAM_ID,
};
use super::tools::ToolRegistry;

#[derive(Error, Debug)]
pub enum ChatStreamError {
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error(transparent)]
    Upstream(#[from] GenerationError),
}

pub struct ChatStreamService {
    provider: Arc<dyn GenerationProvider>,
    tools: Arc<ToolRegistry>,
}

impl ChatStreamService {
    pub fn new(provider: Arc<dyn GenerationProvider>, tools: Arc<ToolRegistry>) -> Self {
        Self { provider, tools }
    }

    /// Stream a tool-capable chat completion for a message history
    pub fn stream_chat(
        &self,
        model: &str,
        messages: &[ClientMessage],
    ) -> UnboundedReceiver<StreamFrame> {
        let request = GenerationRequest {
            contents: convert_to_contents(messages),
            tools: self.tools.definitions(),
            ..Default::default()
        };
        self.spawn_stream(model.to_string(), request, None)
    }

    /// Stream a text-only response to a single prompt
    ///
    /// When `transcript` is supplied, the concatenated text of a successful
    /// run is sent on it after the `finish` event, for persistence.
    pub fn stream_prompt(
        &self,
        model: &str,
        prompt: &str,
        transcript: Option<oneshot::Sender<String>>,
    ) -> UnboundedReceiver<StreamFrame> {
        let request = GenerationRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            ..Default::default()
        };
        self.spawn_stream(model.to_string(), request, transcript)
    }

    fn spawn_stream(
        &self,
        model: String,
        request: GenerationRequest,
        transcript: Option<oneshot::Sender<String>>,
    ) -> UnboundedReceiver<StreamFrame> {
        let (tx, rx) = unbounded::<StreamFrame>();
        let provider = self.provider.clone();
        let tools = self.tools.clone();

        tokio::spawn(async move {
            let emitter = EventEmitter::new(tx);
            match Self::translate_stream(provider, tools, &model, request, &emitter, transcript)
                .await
            {
                Ok(()) => {
                    // Complete message: terminate the frame stream
                    let _ = emitter.done();
                }
                Err(ChatStreamError::Emit(_)) => {
                    tracing::debug!(model, "downstream closed, stopping stream");
                }
                Err(ChatStreamError::Upstream(e)) => {
                    // Fatal upstream fault: end without the terminal marker
                    tracing::error!(model, error = %e, "upstream stream failed");
                }
            }
        });

        rx
    }

    async fn translate_stream(
        provider: Arc<dyn GenerationProvider>,
        tools: Arc<ToolRegistry>,
        model: &str,
        request: GenerationRequest,
        emitter: &EventEmitter,
        transcript: Option<oneshot::Sender<String>>,
    ) -> Result<(), ChatStreamError> {
        let mut session = StreamSession::new(MergePolicy::ReplaceSnapshot);
        let mut collected_text = String::new();

        emitter.emit(UiMessageEvent::Start {
            message_id: session.message_id.clone(),
        })?;

        let mut stream = provider.stream_generate(model, request).await?;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;

            for candidate in &chunk.candidates {
                if let Some(reason) = &candidate.finish_reason {
                    session.finish_reason = Some(reason.clone());
                }

                let Some(content) = &candidate.content else {
                    continue;
                };
                for part in &content.parts {
                    if let Some(text) = part.text.as_deref().filter(|t| !t.is_empty()) {
                        if !session.text_started {
                            emitter.emit(UiMessageEvent::TextStart {
                                id: TEXT_STREAM_ID.to_string(),
                            })?;
                            session.text_started = true;
                        }
                        collected_text.push_str(text);
                        emitter.emit(UiMessageEvent::TextDelta {
                            id: TEXT_STREAM_ID.to_string(),
                            delta: text.to_string(),
                        })?;
                    }

                    if let Some(call) = &part.function_call {
                        let observation = session.tool_calls.observe(call);
                        if observation.first_seen {
                            emitter.emit(UiMessageEvent::ToolInputStart {
                                tool_call_id: observation.call_id.clone(),
                                tool_name: observation.tool_name.clone(),
                            })?;
                        }
                        emitter.emit(UiMessageEvent::ToolInputDelta {
                            tool_call_id: observation.call_id,
                            input_text_delta: observation.input_delta,
                        })?;
                    }
                }
            }

            if let Some(usage) = chunk.usage_metadata {
                session.usage = Some(usage);
            }
        }

        // Close the text segment before any tool resolution
        if session.text_started && !session.text_finished {
            emitter.emit(UiMessageEvent::TextEnd {
                id: TEXT_STREAM_ID.to_string(),
            })?;
            session.text_finished = true;
        }

        // Resolve collected tool calls serially, in first-observation order
        for (record, policy) in session.tool_calls.drain() {
            let call_id = record.call_id.clone();
            let name = record.name.clone();
            let input = record.into_input(policy);

            emitter.emit(UiMessageEvent::ToolInputAvailable {
                tool_call_id: call_id.clone(),
                tool_name: name.clone(),
                input: input.clone(),
            })?;

            match tools.execute(&name, &input).await {
                Ok(output) => {
                    emitter.emit(UiMessageEvent::ToolOutputAvailable {
                        tool_call_id: call_id,
                        output,
                    })?;
                }
                Err(e) => {
                    // A failed tool never aborts the session
                    tracing::warn!(tool = %name, error = %e, "tool execution failed");
                    emitter.emit(UiMessageEvent::ToolOutputError {
                        tool_call_id: call_id,
                        error_text: e.to_string(),
                    })?;
                }
            }
        }

        emitter.emit(UiMessageEvent::Finish {
            message_metadata: build_finish_metadata(
                session.finish_reason.as_deref(),
                session.usage.as_ref(),
            ),
        })?;

        if let Some(sender) = transcript {
            let _ = sender.send(collected_text);
        }

        Ok(())
    }
}
