// src/main.rs
mod browser;
mod config;
mod dashboard;
mod error;
mod form;
mod handlers;
mod layout;
mod models;
mod poll;
mod routes;
mod services;
mod session;
mod state;
mod storage;
mod templates;

use std::time::Duration;

use axum_server::Handle;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok(); // Load environment variables from .env file

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let addr = config.addr();
    info!(api = %config.api_base_url, "Polls API");

    let idle = config.browser_idle;
    let state = AppState::new(config);
    browser::spawn_pruner(state.browsers.clone(), idle);

    let routes = routes::create_routes(state);

    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    info!("Server running at http://{addr}");
    if let Err(e) = axum_server::bind(addr)
        .handle(handle)
        .serve(routes.into_make_service())
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        return;
    }
    info!("Shutting down");
    handle.graceful_shutdown(Some(Duration::from_secs(5)));
}
