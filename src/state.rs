// src/state.rs
use std::sync::Arc;

use crate::config::RelayConfig;
use crate::services::backend::{ChatBackend, GenerationParams};
use crate::services::metrics_manager::MetricsManager;
use crate::services::relay::Relay;
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub relay: Relay,
    pub sessions: SessionManager,
    pub metrics: MetricsManager,
}

impl AppState {
    pub fn new(config: &RelayConfig, backend: Arc<dyn ChatBackend>) -> Self {
        let defaults = GenerationParams {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_p: config.top_p,
        };
        Self {
            relay: Relay::new(backend, defaults),
            sessions: SessionManager::new(config.session_ttl, config.history_limit),
            metrics: MetricsManager::new(),
        }
    }
}
