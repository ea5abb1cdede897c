use std::net::SocketAddr;

use geocode_adapter::config::AdapterConfig;
use geocode_adapter::photon::PhotonClient;
use geocode_adapter::web::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geocode_adapter=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AdapterConfig::from_env();
    let photon = PhotonClient::new(&config)?;

    tracing::info!(
        photon_url = %config.photon_url,
        timeout_secs = config.timeout_secs,
        port = config.port,
        "starting geocode adapter"
    );

    let app = create_router(AppState::new(photon));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");
    tracing::info!("  GET /v1/search   - forward geocoding");
    tracing::info!("  GET /v1/reverse  - reverse geocoding");

    axum::serve(listener, app).await?;

    Ok(())
}
