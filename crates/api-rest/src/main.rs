//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful for development and debugging when you only want the REST server
//! (with OpenAPI/Swagger UI). The workspace's main `rdv-run` binary is the
//! production entry point.

use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use rdv_core::{ContactMessageStore, CoreConfig, FileAppointmentStore, SchedulingService};

/// Main entry point for the RDV REST API server.
///
/// Starts the REST API server on the configured address (default:
/// 0.0.0.0:3000) and serves the booking endpoints with OpenAPI/Swagger
/// documentation.
///
/// # Environment Variables
/// - `RDV_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `RDV_DATA_DIR`: Directory for appointment storage (default: "/rdv_data")
/// - `RDV_STAFF_API_KEY`: API key gating staff endpoints (optional; staff
///   endpoints fail when unset)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the appointment store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("RDV_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("-- Starting RDV REST API on {}", addr);

    let data_dir =
        std::env::var("RDV_DATA_DIR").unwrap_or_else(|_| rdv_core::constants::DEFAULT_DATA_DIR.into());
    let data_path = Path::new(&data_dir);
    if !data_path.exists() {
        anyhow::bail!("Data directory does not exist: {}", data_path.display());
    }

    let staff_api_key = std::env::var("RDV_STAFF_API_KEY").ok();
    if staff_api_key.is_none() {
        tracing::warn!("RDV_STAFF_API_KEY not set; staff endpoints will be rejected");
    }

    let cfg = Arc::new(CoreConfig::new(data_path.to_path_buf()));
    let store = Arc::new(FileAppointmentStore::open(cfg.clone())?);
    let service = SchedulingService::new(cfg.clone(), store);
    let contact_store = ContactMessageStore::open(cfg)?;

    let app = router(AppState::new(service, contact_store, staff_api_key));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
