use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use biopanel_core::{CoreConfig, Panels, PatientService, constants::DEFAULT_REST_ADDR};

/// Main entry point for the Biopanel application
///
/// Seeds one repository per metric kind, starts a value simulator for each, and serves the
/// REST API over the same repositories until Ctrl-C.
///
/// # Environment Variables
/// - `BIOPANEL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `BIOPANEL_TICK_MS`: simulator period in milliseconds (default: 1000)
/// - `BIOPANEL_PATIENT_IDS`: comma-separated patients to seed (default: "1,2,3,4,5")
/// - `BIOPANEL_SIMULATOR`: set to `false` to serve frozen seed data (default: true)
/// - `BIOPANEL_SEED`: optional RNG seed for reproducible simulation
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, binding or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("biopanel_run=info".parse()?)
                .add_directive("biopanel_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr =
        std::env::var("BIOPANEL_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());
    let cfg = CoreConfig::from_process_env()?;

    tracing::info!("++ Starting Biopanel REST on {}", rest_addr);
    tracing::info!(
        "++ Seeding {} patients, simulator {}",
        cfg.patient_ids().len(),
        if cfg.simulator_enabled() { "on" } else { "off" }
    );

    let panels = Panels::seeded(&cfg);
    let simulators = if cfg.simulator_enabled() {
        panels.spawn_simulators(&cfg)?
    } else {
        Vec::new()
    };

    let app = router(AppState::new(PatientService::new(), panels));
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    for handle in simulators {
        handle.shutdown().await;
    }

    tracing::info!("-- Biopanel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}
