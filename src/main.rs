// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::advisory_service::AdvisoryService;
use crate::domain::location::{Coordinates, Location};
use crate::infrastructure::config::{load_locations_config, load_service_config, LocationEntry};
use crate::infrastructure::nominatim::NominatimGeocoder;
use crate::infrastructure::open_meteo::OpenMeteoRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_advisory, health_check, list_locations};

fn to_location(entry: &LocationEntry) -> Location {
    Location::new(
        entry.name.clone(),
        Coordinates::new(entry.latitude, entry.longitude),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let service_config = load_service_config()?;
    let locations_config = load_locations_config()?;

    let timeout = Duration::from_secs(service_config.upstream.request_timeout_secs);

    // Create upstream adapters (infrastructure layer)
    let repository = Arc::new(OpenMeteoRepository::new(
        service_config.upstream.air_quality_url,
        timeout,
    )?);
    let geocoder = Arc::new(NominatimGeocoder::new(
        service_config.upstream.geocoder_url,
        &service_config.upstream.geocoder_user_agent,
        timeout,
    )?);

    // Create the advisory service (application layer)
    let presets: Vec<Location> = locations_config.locations.iter().map(to_location).collect();
    let advisory_service = AdvisoryService::new(
        repository,
        geocoder,
        presets,
        to_location(&locations_config.default),
    );

    // Create application state
    let state = Arc::new(AppState { advisory_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/advisory", get(get_advisory))
        .route("/locations", get(list_locations))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = service_config.service.listen_addr.parse()?;
    println!("Starting air-guard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
