use crate::errors::PointsEngineError;
use crate::models::{
    AddTransactionRequest, MessageResponse, SpendPointsRequest, NO_BALANCES, TRANSACTION_ADDED,
};
use crate::validation::{validate_spend, validate_transaction};
use actix_web::{web, HttpResponse};
use points_ledger::PointsLedger;
use serde_json::json;

/// Health check endpoint
pub async fn health_check(ledger: web::Data<PointsLedger>) -> HttpResponse {
    let config = ledger.config();
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": config.service_name,
        "version": config.service_version
    }))
}

/// Record a contribution
pub async fn add_transaction(
    ledger: web::Data<PointsLedger>,
    request: web::Json<AddTransactionRequest>,
) -> Result<HttpResponse, PointsEngineError> {
    let transaction =
        validate_transaction(&request).map_err(PointsEngineError::Validation)?;

    ledger
        .record_contribution(
            transaction.payer.as_str(),
            transaction.points,
            transaction.timestamp,
        )
        .await?;

    tracing::info!(
        payer = %transaction.payer,
        points = transaction.points,
        "Transaction added"
    );

    Ok(HttpResponse::Ok().json(MessageResponse::new(TRANSACTION_ADDED)))
}

/// Spend points oldest-first and report what each payer lost
pub async fn spend_points(
    ledger: web::Data<PointsLedger>,
    request: web::Json<SpendPointsRequest>,
) -> Result<HttpResponse, PointsEngineError> {
    let points = validate_spend(&request).map_err(PointsEngineError::Validation)?;
    let allocation = ledger.allocate_spend(points).await?;

    tracing::info!(points, payers = allocation.len(), "Points spent");

    Ok(HttpResponse::Ok().json(allocation))
}

/// Current balance per payer
pub async fn view_balances(
    ledger: web::Data<PointsLedger>,
) -> Result<HttpResponse, PointsEngineError> {
    let balances = ledger.balances().await?;

    if balances.is_empty() {
        return Ok(HttpResponse::Ok().json(MessageResponse::new(NO_BALANCES)));
    }

    Ok(HttpResponse::Ok().json(balances))
}

/// Prometheus metrics endpoint
pub async fn metrics_endpoint(ledger: web::Data<PointsLedger>) -> HttpResponse {
    let Some(metrics) = ledger.metrics() else {
        return HttpResponse::NotFound().json(json!({
            "message": "Metrics are disabled."
        }));
    };

    match metrics.render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => HttpResponse::InternalServerError().json(json!({
            "error": "Failed to gather metrics",
            "details": e.to_string()
        })),
    }
}

/// Configure routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        PointsEngineError::Validation(vec![format!("Request body could not be parsed: {}", err)])
            .into()
    });

    cfg.app_data(json_config)
        .route("/addTransaction", web::post().to(add_transaction))
        .route("/spendPoints", web::post().to(spend_points))
        .route("/viewBalances", web::get().to(view_balances))
        .route("/metrics", web::get().to(metrics_endpoint))
        .route("/health", web::get().to(health_check));
}
