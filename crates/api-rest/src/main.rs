//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API over freshly seeded data without starting the simulators.
//!
//! ## Intended use
//! Useful when developing the dashboard against stable values. The workspace's main
//! `biopanel-run` binary serves the same routes with the simulators running.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use biopanel_core::{constants::DEFAULT_REST_ADDR, CoreConfig, Panels, PatientService};

/// Main entry point for the Biopanel REST API server
///
/// # Environment Variables
/// - `BIOPANEL_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `BIOPANEL_PATIENT_IDS`: Patients to seed (default: "1,2,3,4,5")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values cannot be parsed,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("biopanel_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("BIOPANEL_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = CoreConfig::from_process_env()?;

    tracing::info!("-- Starting Biopanel REST API on {} (simulators off)", addr);

    let state = AppState::new(PatientService::new(), Panels::seeded(&cfg));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
