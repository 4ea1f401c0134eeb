//! HTTP server assembly.
//!
//! Combines the public price page, the JSON settings API, and the admin
//! panel into one router and runs it.

use anyhow::{Context, Result};
use axum::{response::Redirect, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::admin::{self, AdminState};
use crate::api::api_router;

/// Server configuration.
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
}

/// Build the full application router.
pub fn app_router(state: Arc<AdminState>) -> Router {
    let public = Router::new()
        .route("/", get(admin::routes::index))
        .with_state(state.clone());

    public
        .merge(api_router(state.settings.clone()))
        .route("/admin", get(|| async { Redirect::to("/admin/login") }))
        .route("/admin/", get(|| async { Redirect::to("/admin/login") }))
        .nest("/admin", admin::admin_router(state))
}

/// Run the HTTP server until it exits.
pub async fn run_server(config: ServerConfig, state: Arc<AdminState>) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;

    info!("HTTP server listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .await
        .context("HTTP server error")?;

    Ok(())
}
