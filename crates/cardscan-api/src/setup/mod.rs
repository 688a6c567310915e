//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use cardscan_core::Config;
use std::sync::Arc;

/// Build every long-lived client and the router.
pub async fn initialize_app(config: &Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(config).context("Configuration validation failed")?;
    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        locale = %config.locale(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(config).await?;
    let analyzer = services::setup_analyzer(config)?;
    let state = services::initialize_services(config, storage, analyzer);

    let router = routes::setup_routes(config, state.clone())?;

    Ok((state, router))
}
