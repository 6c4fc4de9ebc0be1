//! End-to-end tests for the streaming chat endpoint.
//!
//! The generation backend is scripted, so tests assert on the exact event
//! protocol a browser client would see: headers, event ordering, tool
//! failure reporting, and the terminal `[DONE]` marker.

mod common;

use common::*;

use inference_providers::models::UsageMetadata;
use inference_providers::MockProvider;
use serde_json::json;

fn chat_body(text: &str) -> serde_json::Value {
    json!({"messages": [{"role": "user", "content": text}]})
}

#[tokio::test]
async fn chat_streams_ui_message_events() {
    let (server, provider) = setup_default_server();
    provider
        .enqueue(vec![
            Ok(MockProvider::text_chunk("Hello")),
            Ok(MockProvider::text_chunk(" world")),
            Ok(MockProvider::finish_chunk(
                "STOP",
                Some(UsageMetadata {
                    prompt_token_count: 12,
                    candidates_token_count: 4,
                    total_token_count: Some(16),
                }),
            )),
        ])
        .await;

    let response = server.post("/api/chat").json(&chat_body("hi")).await;
    assert_eq!(response.status_code(), 200);

    let headers = response.headers();
    assert_eq!(headers.get("x-vercel-ai-ui-message-stream").unwrap(), "v1");
    assert_eq!(headers.get("x-vercel-ai-protocol").unwrap(), "data");
    assert_eq!(headers.get("cache-control").unwrap(), "no-cache");
    assert_eq!(headers.get("x-accel-buffering").unwrap(), "no");
    assert!(headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let body = response.text();
    assert!(body.trim_end().ends_with("data: [DONE]"));

    let events = parse_sse_events(&body);
    assert_eq!(
        event_types(&events),
        vec!["start", "text-start", "text-delta", "text-delta", "text-end", "finish"]
    );
    assert!(events[0]["messageId"]
        .as_str()
        .unwrap()
        .starts_with("msg-"));
    assert_eq!(events[2]["delta"], "Hello");
    assert_eq!(events[3]["delta"], " world");
    assert_eq!(events[2]["id"], "text-1");

    let metadata = &events[5]["messageMetadata"];
    assert_eq!(metadata["finishReason"], "stop");
    assert_eq!(metadata["usage"]["promptTokens"], 12);
    assert_eq!(metadata["usage"]["completionTokens"], 4);
    assert_eq!(metadata["usage"]["totalTokens"], 16);
}

#[tokio::test]
async fn chat_rejects_empty_message_list() {
    let (server, _provider) = setup_default_server();

    let response = server
        .post("/api/chat")
        .json(&json!({"messages": []}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn protocol_query_parameter_is_echoed() {
    let (server, _provider) = setup_default_server();

    let response = server
        .post("/api/chat?protocol=text")
        .json(&chat_body("hi"))
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.headers().get("x-vercel-ai-protocol").unwrap(),
        "text"
    );
}

#[tokio::test]
async fn unknown_tool_failure_is_reported_inline() {
    let (server, provider) = setup_default_server();
    provider
        .enqueue(vec![
            Ok(MockProvider::function_call_chunk(
                Some("call-7"),
                "lookup_customer",
                json!({"id": 5}),
            )),
            Ok(MockProvider::finish_chunk("STOP", None)),
        ])
        .await;

    let response = server
        .post("/api/chat")
        .json(&chat_body("look up customer 5"))
        .await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    let events = parse_sse_events(&body);
    assert_eq!(
        event_types(&events),
        vec![
            "start",
            "tool-input-start",
            "tool-input-delta",
            "tool-input-available",
            "tool-output-error",
            "finish"
        ]
    );
    assert_eq!(events[1]["toolCallId"], "call-7");
    assert_eq!(events[1]["toolName"], "lookup_customer");
    assert_eq!(events[3]["input"], json!({"id": 5}));
    assert_eq!(events[4]["errorText"], "Tool 'lookup_customer' not found.");

    // The failure never cuts the stream short
    assert!(body.trim_end().ends_with("data: [DONE]"));
}

#[tokio::test]
async fn chat_advertises_registered_tools_upstream() {
    let (server, provider) = setup_default_server();

    let response = server.post("/api/chat").json(&chat_body("hi")).await;
    assert_eq!(response.status_code(), 200);
    response.text();

    let recorded = provider.recorded_requests().await;
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "gemini-2.0-flash");

    let tools = recorded[0].1.tools.as_ref().expect("tools advertised");
    let names: Vec<_> = tools
        .iter()
        .flat_map(|t| t.function_declarations.iter())
        .map(|d| d.name.as_str())
        .collect();
    assert!(names.contains(&"get_current_weather"));
}

#[tokio::test]
async fn health_check_reports_ok() {
    let (server, _provider) = setup_default_server();

    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}
