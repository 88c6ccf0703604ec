use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::ledger::EvaluationLedger;
use super::service::{EvaluationServiceError, LoanEvaluationService};
use crate::intake::Application;
use crate::report::write_ledger_csv;

/// Router exposing evaluation submission, session history and the dashboard.
pub fn evaluation_router<L>(service: Arc<LoanEvaluationService<L>>) -> Router
where
    L: EvaluationLedger + 'static,
{
    Router::new()
        .route(
            "/api/v1/loans/evaluations",
            post(evaluate_handler::<L>).get(history_handler::<L>),
        )
        .route("/api/v1/loans/dashboard", get(dashboard_handler::<L>))
        .route("/api/v1/loans/history.csv", get(export_handler::<L>))
        .with_state(service)
}

pub(crate) async fn evaluate_handler<L>(
    State(service): State<Arc<LoanEvaluationService<L>>>,
    axum::Json(application): axum::Json<Application>,
) -> Response
where
    L: EvaluationLedger + 'static,
{
    match service.evaluate(application) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(EvaluationServiceError::Invalid(report)) => {
            let payload = json!({
                "error": "application failed validation",
                "validation": report,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => internal_error(other),
    }
}

pub(crate) async fn history_handler<L>(
    State(service): State<Arc<LoanEvaluationService<L>>>,
) -> Response
where
    L: EvaluationLedger + 'static,
{
    match service.history() {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn dashboard_handler<L>(
    State(service): State<Arc<LoanEvaluationService<L>>>,
) -> Response
where
    L: EvaluationLedger + 'static,
{
    match service.dashboard() {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => internal_error(error),
    }
}

pub(crate) async fn export_handler<L>(
    State(service): State<Arc<LoanEvaluationService<L>>>,
) -> Response
where
    L: EvaluationLedger + 'static,
{
    let entries = match service.history() {
        Ok(entries) => entries,
        Err(error) => return internal_error(error),
    };

    let mut body = Vec::new();
    if let Err(error) = write_ledger_csv(&mut body, &entries) {
        tracing::error!(%error, "failed to render ledger csv");
        return internal_error(error);
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        body,
    )
        .into_response()
}

fn internal_error(error: impl std::fmt::Display) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
