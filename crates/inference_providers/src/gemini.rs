//! Gemini backend speaking the `streamGenerateContent` SSE protocol

use async_trait::async_trait;
use std::time::Duration;

use crate::models::{GenerationError, GenerationRequest};
use crate::sse_parser::SseParser;
use crate::{GenerationProvider, StreamingResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl GenerationProvider for GeminiProvider {
    async fn stream_generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<StreamingResult, GenerationError> {
        // Gemini API URL format: {base_url}/models/{model}:streamGenerateContent?alt=sse
        // API key is passed via x-goog-api-key header for security
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        );

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Content-Type",
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            "x-goog-api-key",
            reqwest::header::HeaderValue::from_str(&self.api_key)
                .map_err(|e| GenerationError::RequestError(format!("Invalid API key: {e}")))?,
        );

        tracing::debug!(model, "sending streaming generation request");

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::RequestError(e.to_string()))?;

        if !response.status().is_success() {
            let status_code = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|e| format!("Failed to read error response body: {e}"));
            return Err(GenerationError::HttpError {
                status_code,
                message,
            });
        }

        Ok(Box::pin(SseParser::new(response.bytes_stream())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Content, Part};
    use futures_util::StreamExt;
    use httpmock::prelude::*;

    fn request_with_text(text: &str) -> GenerationRequest {
        GenerationRequest {
            contents: vec![Content::user(vec![Part::text(text)])],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn streams_chunks_from_sse_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-2.0-flash:streamGenerateContent")
                .query_param("alt", "sse")
                .header("x-goog-api-key", "test-key");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(concat!(
                    "data: {\"candidates\":[{\"content\":{\"role\":\"model\",\"parts\":[{\"text\":\"Hi\"}]}}]}\n\n",
                    "data: {\"candidates\":[{\"finishReason\":\"STOP\"}],\"usageMetadata\":{\"promptTokenCount\":4,\"candidatesTokenCount\":1,\"totalTokenCount\":5}}\n\n",
                ));
        });

        let provider = GeminiProvider::new(server.base_url(), "test-key");
        let stream = provider
            .stream_generate("gemini-2.0-flash", request_with_text("hello"))
            .await
            .unwrap();
        let chunks: Vec<_> = stream.collect().await;

        mock.assert();
        assert_eq!(chunks.len(), 2);
        let last = chunks[1].as_ref().unwrap();
        assert_eq!(last.candidates[0].finish_reason.as_deref(), Some("STOP"));
        assert_eq!(
            last.usage_metadata.as_ref().unwrap().total_token_count,
            Some(5)
        );
    }

    #[tokio::test]
    async fn non_success_status_becomes_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403).body("permission denied");
        });

        let provider = GeminiProvider::new(server.base_url(), "bad-key");
        let err = provider
            .stream_generate("gemini-2.0-flash", request_with_text("hello"))
            .await
            .err()
            .unwrap();

        match err {
            GenerationError::HttpError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 403);
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
