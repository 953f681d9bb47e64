// src/config.rs
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::services::backend::BackendKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Everything the relay reads from the environment. Credentials, endpoints,
/// model ids and sampling defaults all live here; handlers never see raw
/// env vars or hard-coded values.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    /// Credential for the completion backend. Checked at backend build time,
    /// not here, so the prediction backend can run without one.
    pub api_token: Option<String>,
    pub completion_base_url: String,
    pub completion_model: String,
    pub prediction_base_url: String,
    pub prediction_model: String,
    pub prediction_modality: String,
    pub request_timeout: Duration,
    pub session_ttl: Duration,
    /// Upper bound on stored turns per session; oldest turns drop first.
    pub history_limit: usize,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            backend: BackendKind::Completion,
            api_token: None,
            completion_base_url: "https://router.huggingface.co/v1".to_string(),
            completion_model: "meta-llama/Llama-3.2-3B-Instruct".to_string(),
            prediction_base_url: "https://aifeifei798-feifei-chat.hf.space".to_string(),
            prediction_model: "meta-llama/Llama-3.3-70B-Instruct".to_string(),
            prediction_modality: "pixtral".to_string(),
            request_timeout: Duration::from_secs(30),
            session_ttl: Duration::from_secs(3600),
            history_limit: 100,
            max_tokens: 300,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl RelayConfig {
    /// Builds the config from the process environment, falling back to the
    /// defaults above for anything unset. `main` loads `.env` via dotenvy
    /// before calling this.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = env_var("BIND_ADDR") {
            config.bind_addr = raw
                .parse()
                .map_err(|_| ConfigError::Invalid { key: "BIND_ADDR", value: raw })?;
        }
        if let Some(raw) = env_var("RELAY_BACKEND") {
            config.backend = match raw.as_str() {
                "completion" => BackendKind::Completion,
                "prediction" => BackendKind::Prediction,
                _ => return Err(ConfigError::Invalid { key: "RELAY_BACKEND", value: raw }),
            };
        }
        config.api_token = env_var("HF_API_TOKEN");
        if let Some(url) = env_var("COMPLETION_BASE_URL") {
            config.completion_base_url = url;
        }
        if let Some(model) = env_var("COMPLETION_MODEL") {
            config.completion_model = model;
        }
        if let Some(url) = env_var("PREDICTION_BASE_URL") {
            config.prediction_base_url = url;
        }
        if let Some(model) = env_var("PREDICTION_MODEL") {
            config.prediction_model = model;
        }
        if let Some(modality) = env_var("PREDICTION_MODALITY") {
            config.prediction_modality = modality;
        }
        if let Some(secs) = parse_var::<u64>("REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>("SESSION_TTL_SECS")? {
            config.session_ttl = Duration::from_secs(secs);
        }
        if let Some(limit) = parse_var::<usize>("HISTORY_LIMIT")? {
            if limit == 0 {
                return Err(ConfigError::Invalid { key: "HISTORY_LIMIT", value: "0".into() });
            }
            config.history_limit = limit;
        }
        if let Some(max_tokens) = parse_var::<u32>("MAX_TOKENS")? {
            if max_tokens == 0 {
                return Err(ConfigError::Invalid { key: "MAX_TOKENS", value: "0".into() });
            }
            config.max_tokens = max_tokens;
        }
        if let Some(temperature) = parse_var::<f32>("TEMPERATURE")? {
            config.temperature = temperature;
        }
        if let Some(top_p) = parse_var::<f32>("TOP_P")? {
            config.top_p = top_p;
        }

        Ok(config)
    }
}

fn env_var(key: &'static str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env_var(key) {
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_historical_literals() {
        let config = RelayConfig::default();
        assert_eq!(config.completion_model, "meta-llama/Llama-3.2-3B-Instruct");
        assert_eq!(config.prediction_model, "meta-llama/Llama-3.3-70B-Instruct");
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_p, 0.9);
        assert_eq!(config.bind_addr.port(), 3000);
        assert!(config.api_token.is_none(), "token must come from the environment");
    }

    #[test]
    fn history_is_bounded_by_default() {
        let config = RelayConfig::default();
        assert!(config.history_limit > 0);
        assert!(config.session_ttl > Duration::ZERO);
    }
}
