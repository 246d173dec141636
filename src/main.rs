//! Dungeon Crawler Engine - Backend API for a turn-based dungeon crawler
//!
//! The Engine is the backend server that:
//! - Generates dungeon floors and tracks what each character explored
//! - Resolves movement, combat rounds, class abilities and item use
//! - Persists characters, inventory and combat history in SQLite

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dungeon_crawler_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Dungeon Crawler Engine");

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Database: {}", config.database_url);
    tracing::info!("  Combat log limit: {}", config.game.combat_log_limit);
    tracing::info!("  Session idle timeout: {} min", config.game.session_idle_minutes);

    // Initialize application state
    let state = AppState::new(config).await?;
    let state = Arc::new(state);
    tracing::info!("Application state initialized");

    // Drop sessions of characters nobody is playing
    let _session_cleanup_worker = {
        let sessions = Arc::clone(&state.sessions);
        let idle_timeout = state.config.game.session_idle_timeout();
        tokio::spawn(async move {
            tracing::info!("Starting session cleanup worker");
            loop {
                tokio::time::sleep(SESSION_SWEEP_INTERVAL).await;
                let evicted = sessions.evict_idle(idle_timeout).await;
                if evicted > 0 {
                    let remaining = sessions.len().await;
                    tracing::debug!(evicted, remaining, "Evicted idle sessions");
                }
            }
        })
    };

    // Build the router
    let app = Router::new()
        .route("/health", get(health_check))
        // Merge REST API routes
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(&state));

    // Start the server
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let server = axum::serve(listener, app);

    // Wait for shutdown signal (Ctrl+C)
    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
