//! Client message model and conversion to upstream contents
//!
//! The chat endpoint accepts the UI message shape (role + typed parts) and
//! converts it into the role/parts structure the generation backend expects.
//! Assistant turns map to the "model" role, everything else to "user"; tool
//! parts whose output is already available become function responses so the
//! model sees its earlier calls resolved.

use inference_providers::{Content, FunctionResponse, Part};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessagePart {
    #[serde(rename = "type")]
    pub part_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<ClientMessagePart>>,
}

/// Convert client messages to the upstream content format
pub fn convert_to_contents(messages: &[ClientMessage]) -> Vec<Content> {
    let mut contents = Vec::new();

    for message in messages {
        let role = if message.role == "assistant" {
            "model"
        } else {
            "user"
        };

        let mut parts: Vec<Part> = Vec::new();

        if let Some(message_parts) = &message.parts {
            for part in message_parts {
                if part.part_type == "text" {
                    if let Some(text) = part.text.as_deref().filter(|t| !t.is_empty()) {
                        parts.push(Part::text(text));
                    }
                } else if part.part_type.starts_with("tool-") {
                    // A resolved tool part becomes a function response so the
                    // model sees the call outcome
                    if part.state.as_deref() == Some("output-available") {
                        if let Some(output) = &part.output {
                            parts.push(Part::function_response(FunctionResponse {
                                name: part
                                    .tool_name
                                    .clone()
                                    .unwrap_or_else(|| "unknown".to_string()),
                                response: json!({"result": output}),
                            }));
                        }
                    }
                }
            }
        } else if let Some(content) = &message.content {
            parts.push(Part::text(content));
        }

        if !parts.is_empty() {
            contents.push(Content {
                role: role.to_string(),
                parts,
            });
        }
    }

    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_part(text: &str) -> ClientMessagePart {
        ClientMessagePart {
            part_type: "text".to_string(),
            text: Some(text.to_string()),
            tool_call_id: None,
            tool_name: None,
            state: None,
            input: None,
            output: None,
        }
    }

    #[test]
    fn assistant_role_becomes_model() {
        let messages = vec![
            ClientMessage {
                role: "user".to_string(),
                content: None,
                parts: Some(vec![text_part("hi")]),
            },
            ClientMessage {
                role: "assistant".to_string(),
                content: None,
                parts: Some(vec![text_part("hello")]),
            },
        ];

        let contents = convert_to_contents(&messages);
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
    }

    #[test]
    fn resolved_tool_part_becomes_function_response() {
        let messages = vec![ClientMessage {
            role: "assistant".to_string(),
            content: None,
            parts: Some(vec![ClientMessagePart {
                part_type: "tool-get_current_weather".to_string(),
                text: None,
                tool_call_id: Some("call-1".to_string()),
                tool_name: Some("get_current_weather".to_string()),
                state: Some("output-available".to_string()),
                input: None,
                output: Some(json!({"temperature": 19.4})),
            }]),
        }];

        let contents = convert_to_contents(&messages);
        let response = contents[0].parts[0].function_response.as_ref().unwrap();
        assert_eq!(response.name, "get_current_weather");
        assert_eq!(response.response, json!({"result": {"temperature": 19.4}}));
    }

    #[test]
    fn pending_tool_parts_are_skipped() {
        let messages = vec![ClientMessage {
            role: "assistant".to_string(),
            content: None,
            parts: Some(vec![ClientMessagePart {
                part_type: "tool-get_current_weather".to_string(),
                text: None,
                tool_call_id: Some("call-1".to_string()),
                tool_name: Some("get_current_weather".to_string()),
                state: Some("input-available".to_string()),
                input: Some(json!({"latitude": 1.0})),
                output: None,
            }]),
        }];

        assert!(convert_to_contents(&messages).is_empty());
    }

    #[test]
    fn plain_content_falls_back_to_text_part() {
        let messages = vec![ClientMessage {
            role: "user".to_string(),
            content: Some("plain question".to_string()),
            parts: None,
        }];

        let contents = convert_to_contents(&messages);
        assert_eq!(
            contents[0].parts[0].text.as_deref(),
            Some("plain question")
        );
    }

    #[test]
    fn empty_messages_are_dropped() {
        let messages = vec![ClientMessage {
            role: "user".to_string(),
            content: None,
            parts: Some(vec![text_part("")]),
        }];

        assert!(convert_to_contents(&messages).is_empty());
    }
}
