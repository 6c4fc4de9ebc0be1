//! Streaming chat endpoint

use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;

use super::common::{bad_request, stream_response};
use super::AppState;
use crate::models::{ChatRequest, StreamQuery};

/// `POST /api/chat?protocol=data`
///
/// Streams the tool-capable UI message event sequence for a message history.
pub async fn stream_chat(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    Json(request): Json<ChatRequest>,
) -> Response {
    if let Err(message) = request.validate() {
        return bad_request(message);
    }

    tracing::debug!(
        messages = request.messages.len(),
        model = %state.chat_model,
        "starting chat stream"
    );

    let rx = state.chat.stream_chat(&state.chat_model, &request.messages);
    stream_response(rx, query.protocol())
}
