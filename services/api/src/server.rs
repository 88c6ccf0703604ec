use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryEvaluationLedger};
use crate::routes::with_evaluation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use loan_eval::config::AppConfig;
use loan_eval::error::AppError;
use loan_eval::evaluations::LoanEvaluationService;
use loan_eval::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let ledger = Arc::new(InMemoryEvaluationLedger::default());
    let evaluation_service = Arc::new(LoanEvaluationService::new(
        ledger,
        config.evaluation.clone(),
    ));

    let app = with_evaluation_routes(evaluation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_risk = config.evaluation.approval_max_risk,
        min_credit = config.evaluation.approval_min_credit,
        "loan evaluation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
