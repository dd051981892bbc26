use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use medtrack_core::config::{bool_from_env_value, data_dir_from_env_value};
use medtrack_core::{CoreConfig, MedicationService, MedicationStore, UserId};

/// Main entry point for the MedTrack application
///
/// Resolves configuration once, opens the configured user's medication record and serves the
/// REST API.
///
/// # Environment Variables
/// - `MEDTRACK_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDTRACK_DATA_DIR`: Directory for persisted medications (default: "medtrack_data")
/// - `MEDTRACK_USER_ID`: User whose record is served (default: the only stored user, or a new one)
/// - `MEDTRACK_SEED`: Start new users with the seed medications (default: true)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration is invalid or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medtrack_run=info".parse()?)
                .add_directive("medtrack_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDTRACK_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = data_dir_from_env_value(std::env::var("MEDTRACK_DATA_DIR").ok());
    let seed_new_users = bool_from_env_value(std::env::var("MEDTRACK_SEED").ok(), true)?;
    let cfg = Arc::new(CoreConfig::new(data_dir, seed_new_users)?);

    let user = match std::env::var("MEDTRACK_USER_ID") {
        Ok(id) => UserId::parse(id.trim())?,
        Err(_) => match MedicationStore::new(cfg.clone()).sole_user()? {
            Some(user) => {
                tracing::info!("MEDTRACK_USER_ID not set, serving stored user {}", user);
                user
            }
            None => {
                let user = UserId::new();
                tracing::warn!("MEDTRACK_USER_ID not set, serving new user {}", user);
                user
            }
        },
    };

    tracing::info!("++ Starting MedTrack REST on {}", rest_addr);
    tracing::info!("++ Data directory: {}", cfg.data_dir().display());

    let service = MedicationService::open(cfg, user)?;
    api_rest::serve(&rest_addr, AppState::new(service)).await
}
