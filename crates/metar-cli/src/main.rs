//! METAR wind service - encodes wind observations over HTTP

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use metar_cli::AppSettings;
use metar_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    metar_obs::init("metar-wind");

    // Config
    let cfg = AppConfig::load().context("Failed to load configuration")?;
    let settings = AppSettings::from_config(&cfg)?;
    tracing::info!(station = ?settings.station, unit = %settings.speed_unit, "Loaded configuration");

    let (app, state) = metar_cli::build_app_with(settings);

    let addr: SocketAddr = cfg
        .http_bind()
        .parse()
        .context("Invalid HTTP bind address")?;
    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    // Mark ready just before serving
    metar_cli::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
