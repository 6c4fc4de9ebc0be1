//! Shared response helpers and error mapping

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Json, Response};
use futures::channel::mpsc::UnboundedReceiver;
use futures_util::StreamExt;
use services::chat::StreamFrame;
use services::retrieval::RetrievalError;
use std::convert::Infallible;

use crate::models::ErrorResponse;

/// Standard JSON error reply
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error_response(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: impl Into<String>) -> Response {
    error_response(StatusCode::NOT_FOUND, message)
}

/// Map repository failures to a 500 without leaking internals
pub fn internal_error(error: anyhow::Error) -> Response {
    tracing::error!(error = %error, "request failed");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

/// Map retrieval-stack failures to an upstream-dependency status
pub fn map_retrieval_error(error: RetrievalError) -> Response {
    tracing::error!(error = %error, "retrieval request failed");
    error_response(StatusCode::BAD_GATEWAY, error.to_string())
}

/// Turn a frame stream into the protocol SSE response
///
/// Frames map one-to-one onto `data:` lines; the `Done` frame becomes the
/// `[DONE]` marker. A stream that ends without `Done` simply closes the
/// connection, which is how upstream faults surface to the client.
pub fn stream_response(rx: UnboundedReceiver<StreamFrame>, protocol: &str) -> Response {
    let events = rx.map(|frame| {
        Ok::<Event, Infallible>(match frame {
            StreamFrame::Event(event) => {
                Event::default().data(serde_json::to_string(&event).unwrap_or_default())
            }
            StreamFrame::Done => Event::default().data("[DONE]"),
        })
    });

    let mut response = Sse::new(events).into_response();
    let headers = response.headers_mut();
    headers.insert(
        "x-vercel-ai-ui-message-stream",
        HeaderValue::from_static("v1"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert("x-accel-buffering", HeaderValue::from_static("no"));
    if let Ok(value) = HeaderValue::from_str(protocol) {
        headers.insert("x-vercel-ai-protocol", value);
    }

    response
}
