use std::error::Error;

use tracing::info;
use tracing_subscriber::EnvFilter;

use meetpoint_server::config::AppConfig;
use meetpoint_server::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "meetpoint_server=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = AppConfig::from_env();
    info!(
        isochrones = ?config.isochrone_backend,
        geocoding = ?config.geocoding_backend,
        strategy = ?config.search.strategy,
        "Starting meeting-point planner"
    );

    let state = AppState::from_config(&config)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    let addr = listener.local_addr()?;
    println!("Meeting-point planner listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health              - Health check");
    println!("  GET  /api/categories      - Venue categories");
    println!("  POST /api/zone            - Meeting zone for a fixed budget");
    println!("  POST /api/optimize        - Smallest budget with a meeting zone");
    println!("  POST /api/share           - Encode a scenario as a token");
    println!("  GET  /api/share/{{token}}   - Decode a share token");
    println!("  GET  /api/reverse         - Address for a point");
    println!("  GET  /api/geocode         - Address search");

    axum::serve(listener, app).await?;
    Ok(())
}
