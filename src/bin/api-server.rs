//! Zonewatch API Server
//!
//! Health, metrics, historical klines, contract metadata and the live kline
//! relay for chart clients. The alert workers run as a separate process.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use zonewatch::config::Settings;
use zonewatch::core::http::start_server;
use zonewatch::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let settings = Settings::from_env()?;
    let env = zonewatch::config::get_environment();
    info!("Starting Zonewatch API Server");
    info!(environment = %env, "Environment");
    info!(rest_base = %settings.rest_base, "Market data upstream");

    let server_settings = settings.clone();
    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(&server_settings).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
