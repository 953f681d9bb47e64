use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use chat_relay::config::RelayConfig;
use chat_relay::error::RelayError;
use chat_relay::message::Turn;
use chat_relay::services::backend::{ChatBackend, GenerationParams};
use chat_relay::state::AppState;

/// What the backend was asked on one call.
#[derive(Clone, Debug)]
pub struct SeenRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
    pub params: GenerationParams,
}

/// Scripted stand-in for the remote service: answers every call with a
/// fixed reply or a fixed transport failure, and records what it saw.
pub struct MockBackend {
    reply: String,
    fail: bool,
    pub requests: Mutex<Vec<SeenRequest>>,
}

impl MockBackend {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail: false,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            fail: true,
            requests: Mutex::new(Vec::new()),
        })
    }

    pub async fn calls(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[Turn],
        params: &GenerationParams,
    ) -> Result<String, RelayError> {
        self.requests.lock().await.push(SeenRequest {
            system: system.map(str::to_string),
            turns: turns.to_vec(),
            params: *params,
        });
        if self.fail {
            return Err(RelayError::RemoteUnavailable {
                reason: "connection failed".to_string(),
            });
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// App state wired to a mock backend and default configuration.
pub fn test_state(backend: Arc<MockBackend>) -> Arc<AppState> {
    let config = RelayConfig::default();
    Arc::new(AppState::new(&config, backend))
}
