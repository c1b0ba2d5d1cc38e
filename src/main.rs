use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use rdv_core::{ContactMessageStore, CoreConfig, FileAppointmentStore, SchedulingService};

/// Main entry point for the RDV application.
///
/// Starts the REST server and serves the booking API:
/// - slot queries and booking submissions for clients
/// - dashboard listing and status changes for staff (gated by API key)
/// - Swagger UI on /swagger-ui
///
/// # Environment Variables
/// - `RDV_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `RDV_DATA_DIR`: Directory for appointment storage (default: "/rdv_data")
/// - `RDV_STAFF_API_KEY`: API key for staff endpoints
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("rdv=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("RDV_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!("++ Starting RDV REST on {}", rest_addr);

    let data_dir = std::env::var("RDV_DATA_DIR")
        .unwrap_or_else(|_| rdv_core::constants::DEFAULT_DATA_DIR.into());
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

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
