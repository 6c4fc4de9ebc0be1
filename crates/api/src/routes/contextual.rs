//! Contextual query endpoint
//!
//! Retrieval → advisor prompt → text-only stream. When a user id is supplied
//! the exchange is persisted to a (possibly freshly created) session, and the
//! session id is reported in the `x-session-id` response header so the stream
//! body stays protocol-identical to the chat endpoint.

use axum::extract::{Query, State};
use axum::http::HeaderValue;
use axum::response::Response;
use axum::Json;
use database::ChatSession;
use services::retrieval::{build_contextual_prompt, build_fallback_prompt};
use tokio::sync::oneshot;
use uuid::Uuid;

use super::common::{bad_request, internal_error, stream_response};
use super::AppState;
use crate::models::{ContextualQueryRequest, StreamQuery};

const CONTEXT_LIMIT: usize = 10;

/// `POST /api/contextual-query`
pub async fn contextual_query(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    Json(request): Json<ContextualQueryRequest>,
) -> Response {
    if let Err(message) = request.validate() {
        return bad_request(message);
    }

    // Retrieval faults degrade to the no-context prompt rather than failing
    // the request
    let prompt = match state
        .retrieval
        .get_context(&request.company_id, &request.task, CONTEXT_LIMIT)
        .await
    {
        Ok(context) if !context.is_empty() => build_contextual_prompt(&request.task, &context),
        Ok(_) => build_fallback_prompt(&request.task),
        Err(e) => {
            tracing::warn!(
                company_id = %request.company_id,
                error = %e,
                "retrieval unavailable, answering without context"
            );
            build_fallback_prompt(&request.task)
        }
    };

    // Persist the exchange when the caller identifies themselves
    let mut session: Option<ChatSession> = None;
    let mut transcript_tx: Option<oneshot::Sender<String>> = None;

    if let Some(user_id) = &request.user_id {
        match resolve_session(&state, user_id, &request.company_id, request.session_id).await {
            Ok(resolved) => {
                if let Err(e) = state
                    .db
                    .sessions
                    .append_message(resolved.id, "user", &request.task)
                    .await
                {
                    return internal_error(e);
                }

                let (tx, rx) = oneshot::channel::<String>();
                transcript_tx = Some(tx);
                let db = state.db.clone();
                let session_id = resolved.id;
                tokio::spawn(async move {
                    if let Ok(reply) = rx.await {
                        if let Err(e) = db
                            .sessions
                            .append_message(session_id, "assistant", &reply)
                            .await
                        {
                            tracing::error!(
                                session_id = %session_id,
                                error = %e,
                                "failed to persist assistant reply"
                            );
                        }
                    }
                });
                session = Some(resolved);
            }
            Err(e) => return internal_error(e),
        }
    }

    let rx = state
        .chat
        .stream_prompt(&state.contextual_model, &prompt, transcript_tx);
    let mut response = stream_response(rx, query.protocol());

    if let Some(session) = session {
        if let Ok(value) = HeaderValue::from_str(&session.id.to_string()) {
            response.headers_mut().insert("x-session-id", value);
        }
    }

    response
}

/// Reuse the requested session when it exists, otherwise start a new one
async fn resolve_session(
    state: &AppState,
    user_external_id: &str,
    company_id: &str,
    session_id: Option<Uuid>,
) -> anyhow::Result<ChatSession> {
    let user = state.db.users.get_or_create(user_external_id).await?;

    if let Some(session_id) = session_id {
        if let Some(existing) = state.db.sessions.get(session_id).await? {
            if existing.user_id == user.id {
                return Ok(existing);
            }
        }
    }

    state.db.sessions.create(user.id, company_id).await
}
