//! Wire models for the Gemini generation API
//!
//! Request and response structs mirror the `generateContent` JSON shapes
//! (camelCase on the wire). The same chunk model is produced by the real
//! backend and by [`crate::MockProvider`], so everything above this crate is
//! backend-agnostic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One part of a content entry: text, a function call emitted by the model,
/// or a function response fed back in.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_call(call: FunctionCall) -> Self {
        Self {
            function_call: Some(call),
            ..Default::default()
        }
    }

    pub fn function_response(response: FunctionResponse) -> Self {
        Self {
            function_response: Some(response),
            ..Default::default()
        }
    }
}

/// A function call fragment. Streaming chunks may repeat the same call with a
/// progressively larger `args` snapshot; `id` is only present when the
/// backend assigns one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Result of a locally executed function, sent back as a user-role part.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub name: String,
    pub response: serde_json::Value,
}

/// A role-tagged list of parts. Roles are "user" or "model".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: "user".to_string(),
            parts,
        }
    }

    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: "model".to_string(),
            parts,
        }
    }
}

/// System instruction block (no role on the wire)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

/// Declares a callable function to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Tool block wrapping function declarations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub function_declarations: Vec<FunctionDeclaration>,
}

/// Generation tuning parameters
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i64>,
}

/// Full request body for `:streamGenerateContent`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// One streamed candidate. `content` may be absent on chunks that only carry
/// a finish reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token accounting reported by the backend. `total_token_count` stays `None`
/// when the backend does not report it; it is never derived by summing.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: i64,
    #[serde(default)]
    pub candidates_token_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_token_count: Option<i64>,
}

/// One chunk of a streaming generation response
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationChunk {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerationChunk {
    /// Shorthand for a chunk with a single model candidate holding `parts`
    pub fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content::model(parts)),
                finish_reason: None,
            }],
            usage_metadata: None,
        }
    }
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to perform generation request: {0}")]
    RequestError(String),
    #[error("Generation backend returned HTTP {status_code}: {message}")]
    HttpError { status_code: u16, message: String },
    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chunk_deserializes_text_and_finish() {
        let raw = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Hello"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {
                "promptTokenCount": 10,
                "candidatesTokenCount": 3,
                "totalTokenCount": 13
            }
        });

        let chunk: GenerationChunk = serde_json::from_value(raw).unwrap();
        let candidate = &chunk.candidates[0];
        assert_eq!(candidate.finish_reason.as_deref(), Some("STOP"));
        let parts = &candidate.content.as_ref().unwrap().parts;
        assert_eq!(parts[0].text.as_deref(), Some("Hello"));

        let usage = chunk.usage_metadata.unwrap();
        assert_eq!(usage.prompt_token_count, 10);
        assert_eq!(usage.candidates_token_count, 3);
        assert_eq!(usage.total_token_count, Some(13));
    }

    #[test]
    fn chunk_deserializes_function_call_without_id() {
        let raw = json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{
                        "functionCall": {
                            "name": "get_current_weather",
                            "args": {"latitude": 48.85, "longitude": 2.35}
                        }
                    }]
                }
            }]
        });

        let chunk: GenerationChunk = serde_json::from_value(raw).unwrap();
        let part = &chunk.candidates[0].content.as_ref().unwrap().parts[0];
        let call = part.function_call.as_ref().unwrap();
        assert!(call.id.is_none());
        assert_eq!(call.name, "get_current_weather");
        assert_eq!(call.args["latitude"], json!(48.85));
    }

    #[test]
    fn usage_total_stays_absent_when_not_reported() {
        let raw = json!({
            "candidates": [],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2}
        });

        let chunk: GenerationChunk = serde_json::from_value(raw).unwrap();
        assert_eq!(chunk.usage_metadata.unwrap().total_token_count, None);
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = GenerationRequest {
            contents: vec![Content::user(vec![Part::text("hi")])],
            system_instruction: Some(SystemInstruction::from_text("You are helpful.")),
            tools: Some(vec![Tool {
                function_declarations: vec![FunctionDeclaration {
                    name: "get_current_weather".to_string(),
                    description: "Weather lookup".to_string(),
                    parameters: json!({"type": "object"}),
                }],
            }]),
            generation_config: Some(GenerationConfig {
                max_output_tokens: Some(1024),
                ..Default::default()
            }),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("systemInstruction").is_some());
        assert!(value["tools"][0].get("functionDeclarations").is_some());
        assert_eq!(value["generationConfig"]["maxOutputTokens"], json!(1024));
        // Unset optional fields stay off the wire entirely
        assert!(value["generationConfig"].get("temperature").is_none());
    }
}
