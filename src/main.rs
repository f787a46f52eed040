use anyhow::{Context, Result};

use weather_portfolio::{server, telemetry, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Loaded before Config so .env values participate
    let dotenv = dotenvy::dotenv();
    let config = Config::from_env();

    // Logging comes up before config is validated so its errors are logged too
    let log_format = config.as_ref().map(|c| c.log_format).unwrap_or_default();
    telemetry::init(log_format).context("Failed to initialize logging")?;

    if dotenv.is_err() {
        tracing::info!("No .env file found, using system environment");
    }
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e).context("Invalid configuration");
        }
    };
    tracing::info!(
        provider = ?config.weather_provider,
        local_ip = config.local_ip.as_deref().unwrap_or(""),
        "Starting weather portfolio"
    );

    if let Err(e) = server::run_http_server(&config).await {
        tracing::error!("Server failed: {:#}", e);
        return Err(e);
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}
