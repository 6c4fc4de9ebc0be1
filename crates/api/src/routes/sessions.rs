//! Session and chat-history endpoints

use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Json, Response};
use uuid::Uuid;

use super::common::{internal_error, not_found};
use super::AppState;
use crate::models::ChatHistoryQuery;

/// `GET /api/users/{user_id}/chat-history?company_id&limit`
pub async fn chat_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ChatHistoryQuery>,
) -> Response {
    let user = match state.db.users.get_by_external_id(&user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return not_found(format!("user '{user_id}' not found")),
        Err(e) => return internal_error(e),
    };

    match state
        .db
        .sessions
        .history_for_user(user.id, query.company_id.as_deref(), query.limit())
        .await
    {
        Ok(history) => Json(history).into_response(),
        Err(e) => internal_error(e),
    }
}

/// `GET /api/sessions/{session_id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Response {
    match state.db.sessions.get(session_id).await {
        Ok(Some(session)) => Json(session).into_response(),
        Ok(None) => not_found(format!("session '{session_id}' not found")),
        Err(e) => internal_error(e),
    }
}

/// `GET /api/sessions/{session_id}/messages`
pub async fn get_session_messages(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Response {
    match state.db.sessions.get(session_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found(format!("session '{session_id}' not found")),
        Err(e) => return internal_error(e),
    }

    match state.db.sessions.messages(session_id).await {
        Ok(messages) => Json(messages).into_response(),
        Err(e) => internal_error(e),
    }
}
