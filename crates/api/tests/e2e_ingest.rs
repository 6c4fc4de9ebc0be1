//! End-to-end tests for the company ingestion endpoint.

mod common;

use std::sync::Arc;

use common::*;

use serde_json::json;

#[tokio::test]
async fn ingest_reports_what_was_indexed() {
    let index = Arc::new(ScriptedIndex::default());
    let (server, _provider) = setup_server(index.clone());

    let response = server
        .post("/api/companies/acme/ingest")
        .json(&json!({
            "items": [
                {"title": "Fix index", "sprint": 2, "tags": ["database"]},
                {"no_text_here": true},
                "not an object"
            ]
        }))
        .await;

    assert_eq!(response.status_code(), 200);
    let report: serde_json::Value = response.json();
    assert_eq!(report["success"], true);
    assert_eq!(report["company_id"], "acme");
    assert_eq!(report["items_ingested"], 1);
    assert_eq!(report["collection_name"], "company_acme");

    assert_eq!(
        index.collections.lock().unwrap().as_slice(),
        ["company_acme"]
    );
    let upserts = index.upserts.lock().unwrap();
    let (collection, points) = &upserts[0];
    assert_eq!(collection, "company_acme");
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].payload["company_id"], "acme");
    assert_eq!(points[0].payload["sprint"], 2);
    assert_eq!(points[0].payload["content"], "Fix index | database");
}

#[tokio::test]
async fn ingest_rejects_empty_batches() {
    let (server, _provider) = setup_default_server();

    let response = server
        .post("/api/companies/acme/ingest")
        .json(&json!({"items": []}))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].is_string());
}
