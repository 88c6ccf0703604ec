use super::common::*;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::evaluations::router::{dashboard_handler, evaluate_handler, history_handler};
use crate::evaluations::LoanEvaluationService;
use crate::scoring::EvaluationConfig;

#[tokio::test]
async fn evaluate_handler_returns_created_record() {
    let (service, ledger) = build_service();

    let response =
        evaluate_handler::<MemoryLedger>(State(Arc::new(service)), axum::Json(approved_application()))
            .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["id"], json!("eval-000001"));
    assert_eq!(payload["result"]["approved"], json!(true));
    assert_eq!(payload["result"]["risk"]["value"]["risk_category"], json!("LOW"));
    assert_eq!(payload["result"]["credit"]["value"]["grade"], json!("Very Good"));
    assert!(payload["result"]["risk"].get("fallback").is_none());
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn evaluate_handler_returns_unprocessable_with_report() {
    let (service, ledger) = build_service();

    let response = evaluate_handler::<MemoryLedger>(
        State(Arc::new(service)),
        axum::Json(incomplete_application()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["validation"]["is_valid"], json!(false));
    assert_eq!(
        payload["validation"]["errors"],
        json!(["Missing required section: credit"])
    );
    assert_eq!(ledger.len(), 0);
}

#[tokio::test]
async fn evaluate_handler_returns_internal_error_on_ledger_failure() {
    let service = Arc::new(LoanEvaluationService::new(
        Arc::new(UnavailableLedger),
        EvaluationConfig::default(),
    ));

    let response =
        evaluate_handler::<UnavailableLedger>(State(service.clone()), axum::Json(approved_application()))
            .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = history_handler::<UnavailableLedger>(State(service)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn evaluate_route_accepts_string_numbers() {
    let (service, _) = build_service();
    let router = evaluation_router_with_service(service);

    let body = json!({
        "personal": {"age": "41", "employment_status": "Self-Employed"},
        "financial": {"annual_income": "$120,000", "existing_debts": "30,000"},
        "loan": {"loan_amount": "40000", "loan_purpose": "Home Improvement"},
        "credit": {"credit_score": "780", "previous_defaults": 0, "credit_history_length": 12},
        "geolocation": {"state": "california", "city": "San Diego", "zip_code": "92101"}
    });

    let response = router
        .oneshot(
            Request::post("/api/v1/loans/evaluations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    // 780 + 20 (no defaults) + 15 (12 years of history)
    assert_eq!(payload["result"]["credit"]["value"]["score"], json!(815));
    assert_eq!(payload["requested_amount"], json!(40_000.0));
    assert_eq!(payload["result"]["approved"], json!(true));
}

#[tokio::test]
async fn history_and_dashboard_routes_follow_submissions() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    service.evaluate(approved_application()).expect("approved");
    service.evaluate(rejected_application()).expect("rejected");

    let response = history_handler::<MemoryLedger>(State(service.clone())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries = read_json_body(response).await;
    let entries = entries.as_array().expect("history is a list");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], json!("eval-000001"));
    assert_eq!(entries[1]["risk_category"], json!("MEDIUM"));

    let response = dashboard_handler::<MemoryLedger>(State(service)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let summary = read_json_body(response).await;
    assert_eq!(summary["total_applications"], json!(2));
    assert_eq!(summary["approved"], json!(1));
    assert_eq!(summary["approval_rate"], json!(0.5));
    let buckets: Vec<Value> = summary["risk_distribution"]
        .as_array()
        .cloned()
        .unwrap_or_default();
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0]["label"], json!("LOW"));
    assert_eq!(buckets[0]["count"], json!(1));
}

#[tokio::test]
async fn csv_route_exports_ledger() {
    let (service, _) = build_service();
    service.evaluate(approved_application()).expect("approved");
    let router = evaluation_router_with_service(service);

    let response = router
        .oneshot(
            Request::get("/api/v1/loans/history.csv")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("text/csv; charset=utf-8")
    );
    let text = read_text_body(response).await;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("id,submitted_at,requested_amount"));
    assert!(lines[1].starts_with("eval-000001,"));
    assert!(lines[1].contains(",LOW,740,true,"));
}
