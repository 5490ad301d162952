//! HTTP server initialization.
//!
//! [`serve`] opens the database, builds the [`Rewards`] engine and runs the axum
//! router until ctrl-c.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::HollowConfig;
use crate::rewards::Rewards;
use crate::routes::{build_router, AppState};
use crate::store::SqliteStore;

/// Open the store and build the engine from config.
pub fn setup_rewards(config: &HollowConfig) -> Result<Rewards<SqliteStore>> {
    let db_path = config.resolved_db_path();
    let store = SqliteStore::open(&db_path)?;
    tracing::info!(db = %db_path.display(), "database ready");

    let settings = config.rewards.settings()?;
    tracing::info!(
        locale = %settings.default_locale,
        offset = %settings.utc_offset,
        policy = ?settings.progress_policy,
        "rewards engine ready"
    );
    Ok(Rewards::new(Arc::new(store), settings))
}

/// Start the HTTP API.
pub async fn serve(config: HollowConfig) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let rewards = setup_rewards(&config)?;
    let router = build_router(AppState { rewards });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(addr = %bind_addr, "hollow listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
