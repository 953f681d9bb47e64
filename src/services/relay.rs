// src/services/relay.rs
use std::sync::Arc;

use crate::error::RelayError;
use crate::message::Turn;
use crate::services::backend::{ChatBackend, GenerationParams, SamplingOverrides};

/// Per-request knobs the caller may set on top of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct RespondOptions {
    pub system_message: Option<String>,
    pub sampling: SamplingOverrides,
}

/// The user/assistant turn pair produced by one successful relay round.
/// Callers append it to whichever history they manage; on failure nothing
/// is appended anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub user: Turn,
    pub assistant: Turn,
}

/// The relay core: validates the incoming message, hands the conversation
/// to the configured backend and normalizes the reply. It never touches
/// conversation state itself.
pub struct Relay {
    backend: Arc<dyn ChatBackend>,
    defaults: GenerationParams,
}

impl Relay {
    pub fn new(backend: Arc<dyn ChatBackend>, defaults: GenerationParams) -> Self {
        Self { backend, defaults }
    }

    /// Name of the backend serving this relay.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Produces the assistant reply for `message` asked against `history`.
    ///
    /// A whitespace-only message is rejected before any outbound call.
    /// Newlines in the reply are flattened to spaces so every turn stays a
    /// single line regardless of which backend produced it.
    pub async fn respond(
        &self,
        history: &[Turn],
        message: &str,
        options: &RespondOptions,
    ) -> Result<Exchange, RelayError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(RelayError::EmptyMessage);
        }

        let user = Turn::user(message);
        let mut turns = Vec::with_capacity(history.len() + 1);
        turns.extend_from_slice(history);
        turns.push(user.clone());

        let params = self.defaults.merged(options.sampling);
        let reply = self
            .backend
            .generate(options.system_message.as_deref(), &turns, &params)
            .await?;

        let assistant = Turn::assistant(reply.replace('\n', " "));
        Ok(Exchange { user, assistant })
    }
}
