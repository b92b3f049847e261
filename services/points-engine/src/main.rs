use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use points_engine::{config::Config, handlers};
use points_ledger::PointsLedger;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .json()
        .init();

    info!("Starting Points Engine...");

    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
    info!("Configuration loaded successfully");

    let ledger = PointsLedger::open(config.ledger_config())
        .map_err(|e| anyhow::anyhow!("Failed to open points ledger: {}", e))?;
    let data = web::Data::new(ledger.clone());

    let server_config = config.server.clone();
    info!(
        "Starting HTTP server on {}:{}",
        server_config.host, server_config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(handlers::configure_routes)
    })
    .workers(server_config.workers)
    .bind((server_config.host.as_str(), server_config.port))?
    .run()
    .await?;

    info!("Shutting down points ledger");
    ledger
        .shutdown()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to stop points ledger: {}", e))?;
    Ok(())
}
