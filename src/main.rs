use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use intake_core::{config::data_dir_from_env_value, CoreConfig, ReviewStore};

/// Main entry point for the intake portal server
///
/// Resolves configuration once, opens the review store and serves the REST API.
///
/// # Environment Variables
/// - `INTAKE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `INTAKE_DATA_DIR`: Directory holding `intake_submissions.json` (default: "intake_data")
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, store setup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("intake_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("intake_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("INTAKE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = data_dir_from_env_value(std::env::var("INTAKE_DATA_DIR").ok());

    let cfg = Arc::new(CoreConfig::new(data_dir)?);
    tracing::info!("-- Intake data directory: {}", cfg.data_dir().display());
    let store = Arc::new(ReviewStore::new(cfg)?);

    api_rest::serve(&rest_addr, AppState { store }).await
}
