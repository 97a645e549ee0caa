// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use anyhow::Context;
use axum::{routing::get, Router};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;

use crate::application::aqi_service::AqiService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::memory_repository::InMemoryMeasurementRepository;
use crate::infrastructure::open_meteo::OpenMeteoClient;
use crate::infrastructure::visibility_store::ConfigVisibilityRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_aqi, health_check, list_measurements};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create adapters (infrastructure layer)
    let provider = Arc::new(OpenMeteoClient::new(app_config.open_meteo.clone()));
    let repository = Arc::new(InMemoryMeasurementRepository::new());
    let visibility = Arc::new(ConfigVisibilityRepository::new(app_config.viewers.clone()));
    tracing::info!("Loaded visibility settings for {} viewers", app_config.viewers.len());

    // Create services (application layer)
    let aqi_service = AqiService::new(provider, repository, visibility);

    let state = Arc::new(AppState { aqi_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/aqi", get(get_aqi))
        .route("/locations/:id/measurements", get(list_measurements))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = app_config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", app_config.server.bind))?;
    tracing::info!("Starting air-quality-dashboard on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
