use crate::{GenerationChunk, GenerationError};
use bytes::Bytes;
use futures_util::Stream;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

/// SSE (Server-Sent Events) stream parser that properly handles buffering
/// of incomplete events across HTTP chunks
///
/// HTTP chunk boundaries do not line up with SSE event boundaries, so bytes
/// accumulate in a buffer and complete `data:` lines are parsed out of it.
/// Parsed events queue up so that one HTTP chunk containing several events
/// yields them all, in order.
pub struct SseParser<S> {
    inner: S,
    buffer: String,
    pending: VecDeque<Result<GenerationChunk, GenerationError>>,
}

impl<S> SseParser<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: String::new(),
            pending: VecDeque::new(),
        }
    }

    fn parse_sse_event(data: &str) -> Option<Result<GenerationChunk, GenerationError>> {
        // Handle end-of-stream marker
        if data == "[DONE]" {
            return None;
        }

        match serde_json::from_str::<GenerationChunk>(data) {
            Ok(chunk) => Some(Ok(chunk)),
            Err(e) => {
                tracing::warn!("Failed to parse SSE chunk: {e}");
                Some(Err(GenerationError::InvalidResponse(format!(
                    "Invalid JSON in SSE event: {e}"
                ))))
            }
        }
    }

    fn process_buffer(&mut self) {
        // Process complete lines in the buffer
        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer.drain(..=newline_pos).collect::<String>();
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with(':') {
                continue;
            }

            // Look for data: lines
            if let Some(data) = line.strip_prefix("data: ") {
                if let Some(result) = Self::parse_sse_event(data) {
                    self.pending.push_back(result);
                }
            }
        }
    }
}

impl<S> Stream for SseParser<S>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    type Item = Result<GenerationChunk, GenerationError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            // Drain any event parsed on a previous poll first
            if let Some(result) = self.pending.pop_front() {
                return Poll::Ready(Some(result));
            }

            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    let text = String::from_utf8_lossy(&bytes);
                    self.buffer.push_str(&text);
                    self.process_buffer();
                    // Loop back: either an event is now pending or we need
                    // more bytes
                }
                Poll::Ready(Some(Err(e))) => {
                    return Poll::Ready(Some(Err(GenerationError::RequestError(e.to_string()))));
                }
                Poll::Ready(None) => {
                    // Stream ended - anything left in the buffer is an
                    // incomplete event
                    if !self.buffer.trim().is_empty() {
                        tracing::warn!("Incomplete SSE data in buffer at stream end");
                    }
                    return Poll::Ready(None);
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
