//! Generation providers crate for streaming LLM backends
//!
//! This crate provides a streaming-first trait interface over generation
//! backends. Everything downstream consumes the same chunk stream whether the
//! chunks come from the real Gemini API or a scripted mock, so the stream
//! translation layer can be tested without network access.
//!
//! # Streaming-First Design
//!
//! The single entry point returns a stream of [`GenerationChunk`]s rather than
//! a complete response. Chunks carry text fragments, function-call fragments,
//! a finish reason on the closing candidate, and (when the backend reports it)
//! usage metadata.
//!
//! # Usage
//!
//! ```rust,ignore
//! use inference_providers::{GenerationProvider, GenerationRequest};
//! use futures_util::StreamExt;
//!
//! async fn example<P: GenerationProvider>(provider: P, request: GenerationRequest) {
//!     let mut stream = provider.stream_generate("gemini-2.0-flash", request).await?;
//!     while let Some(chunk) = stream.next().await {
//!         match chunk {
//!             Ok(chunk) => println!("fragments: {:?}", chunk.candidates),
//!             Err(e) => eprintln!("stream error: {e}"),
//!         }
//!     }
//! }
//! ```

pub mod gemini;
pub mod mock;
pub mod models;
pub mod sse_parser;

use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

// Re-export commonly used types for convenience
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use models::{
    Candidate, Content, FunctionCall, FunctionDeclaration, FunctionResponse, GenerationChunk,
    GenerationConfig, GenerationError, GenerationRequest, Part, SystemInstruction, Tool,
    UsageMetadata,
};

/// Type alias for streaming generation results
///
/// Each item is one parsed chunk from the backend's SSE stream, or the error
/// that ended the stream.
pub type StreamingResult =
    Pin<Box<dyn Stream<Item = Result<GenerationChunk, GenerationError>> + Send>>;

#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Performs a streaming generation request
    ///
    /// Returns a stream of [`GenerationChunk`]s that can be processed
    /// incrementally. The stream emits chunks as they arrive from the
    /// underlying backend and ends after the chunk carrying the finish
    /// reason (and, usually, usage metadata).
    async fn stream_generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<StreamingResult, GenerationError>;
}
