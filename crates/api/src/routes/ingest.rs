//! Ingestion endpoint

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Response};

use super::common::{bad_request, map_retrieval_error};
use super::AppState;
use crate::models::IngestRequest;

/// `POST /api/companies/{company_id}/ingest`
pub async fn ingest_company_data(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
    Json(request): Json<IngestRequest>,
) -> Response {
    if let Err(message) = request.validate() {
        return bad_request(message);
    }

    match state.ingest.ingest(&company_id, request.items).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => map_retrieval_error(e),
    }
}
