// src/services/backend.rs
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::message::Turn;
use crate::services::completion::CompletionBackend;
use crate::services::prediction::PredictionBackend;

/// TCP connect timeout for outbound calls. The total request timeout comes
/// from `RelayConfig::request_timeout`.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Which remote integration serves the relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Completion,
    Prediction,
}

/// Resolved sampling parameters for one outbound call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl GenerationParams {
    /// Applies caller overrides on top of these defaults.
    pub fn merged(self, overrides: SamplingOverrides) -> Self {
        Self {
            max_tokens: overrides.max_tokens.unwrap_or(self.max_tokens),
            temperature: overrides.temperature.unwrap_or(self.temperature),
            top_p: overrides.top_p.unwrap_or(self.top_p),
        }
    }
}

/// Per-request sampling overrides collected from the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplingOverrides {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

/// A remote integration that produces one assistant reply for a
/// conversation: the relay's only capability, "generate a reply given
/// message + history + parameters". `turns` always ends with the new user
/// turn; `system` is an optional system prompt the integration may encode
/// however its wire format expects.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[Turn],
        params: &GenerationParams,
    ) -> Result<String, RelayError>;

    /// Short tag for logs and startup messages.
    fn name(&self) -> &'static str;
}

impl std::fmt::Debug for dyn ChatBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatBackend").field("name", &self.name()).finish()
    }
}

/// Builds the configured backend. Fails at startup on a missing credential
/// or an unusable HTTP client rather than at the first request.
pub fn build_backend(config: &RelayConfig) -> anyhow::Result<Arc<dyn ChatBackend>> {
    let http = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(config.request_timeout)
        .build()
        .context("failed to build the outbound HTTP client")?;

    match config.backend {
        BackendKind::Completion => {
            let token = config
                .api_token
                .clone()
                .context("HF_API_TOKEN must be set when RELAY_BACKEND=completion")?;
            Ok(Arc::new(CompletionBackend::new(
                http,
                config.completion_base_url.clone(),
                config.completion_model.clone(),
                token,
            )))
        }
        BackendKind::Prediction => Ok(Arc::new(PredictionBackend::new(
            http,
            config.prediction_base_url.clone(),
            config.prediction_model.clone(),
            config.prediction_modality.clone(),
        ))),
    }
}

/// Folds reqwest transport failures into the unreachable-service kind.
pub(crate) fn transport_error(err: reqwest::Error) -> RelayError {
    let reason = if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    };
    RelayError::RemoteUnavailable { reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_defaults() {
        let defaults = GenerationParams { max_tokens: 300, temperature: 0.7, top_p: 0.9 };
        let merged = defaults.merged(SamplingOverrides {
            max_tokens: Some(64),
            temperature: None,
            top_p: Some(0.5),
        });
        assert_eq!(merged.max_tokens, 64);
        assert_eq!(merged.temperature, 0.7);
        assert_eq!(merged.top_p, 0.5);
    }

    #[test]
    fn completion_backend_requires_a_token() {
        let config = RelayConfig::default();
        assert!(config.api_token.is_none());
        let err = build_backend(&config).unwrap_err();
        assert!(err.to_string().contains("HF_API_TOKEN"));
    }

    #[test]
    fn prediction_backend_needs_no_token() {
        let config = RelayConfig {
            backend: BackendKind::Prediction,
            ..RelayConfig::default()
        };
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "prediction");
    }

    #[test]
    fn completion_backend_builds_with_a_token() {
        let config = RelayConfig {
            api_token: Some("test-token".to_string()),
            ..RelayConfig::default()
        };
        let backend = build_backend(&config).unwrap();
        assert_eq!(backend.name(), "completion");
    }
}
