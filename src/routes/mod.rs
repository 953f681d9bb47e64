// src/routes/mod.rs
pub mod chat;

use crate::state::SharedState;
use axum::{
    Router,
    routing::{get, post},
};
use chat::{
    chat_respond_handler, get_history_handler, get_i18n_handler, get_metrics_handler,
    respond_handler, welcome_handler,
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/chat/respond", post(chat_respond_handler))
        .route("/respond", post(respond_handler))
        .route("/history", get(get_history_handler))
        .route("/i18n", get(get_i18n_handler))
        .route("/metrics", get(get_metrics_handler))
        .route("/health", get(|| async { "OK" }))
        .fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
}
