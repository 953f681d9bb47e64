// src/main.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use chat_relay::config::RelayConfig;
use chat_relay::routes;
use chat_relay::services::backend::build_backend;
use chat_relay::state::AppState;

/// How often idle sessions are swept.
const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chat_relay=info,tower_http=info")),
        )
        .init();

    let config = RelayConfig::from_env()?;
    let backend = build_backend(&config)?;
    tracing::info!(backend = backend.name(), "configured relay backend");

    let state = Arc::new(AppState::new(&config, backend));

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(PURGE_INTERVAL);
        loop {
            tick.tick().await;
            let removed = sessions.purge_expired().await;
            if removed > 0 {
                tracing::debug!(removed, "purged idle sessions");
            }
        }
    });

    let cors = CorsLayer::very_permissive();

    let app = routes::create_router().with_state(state).layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    println!("🚀 chat-relay running at http://{}", config.bind_addr);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
