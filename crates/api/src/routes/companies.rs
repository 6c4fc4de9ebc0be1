//! Company metadata endpoints

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::common::{internal_error, not_found};
use super::AppState;

/// `GET /api/companies`
///
/// Returns the summary listing used by the company picker.
pub async fn list_companies(State(state): State<AppState>) -> Response {
    match state.db.companies.list().await {
        Ok(companies) => {
            let listing: Vec<_> = companies
                .iter()
                .map(|c| {
                    json!({
                        "company_id": c.company_id,
                        "name": c.name,
                        "short_summary": c.short_summary,
                    })
                })
                .collect();
            Json(listing).into_response()
        }
        Err(e) => internal_error(e),
    }
}

/// `GET /api/companies/{company_id}`
pub async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<String>,
) -> Response {
    match state.db.companies.get(&company_id).await {
        Ok(Some(company)) => Json(company).into_response(),
        Ok(None) => not_found(format!("company '{company_id}' not found")),
        Err(e) => internal_error(e),
    }
}
