// src/services/completion.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::message::Turn;
use crate::services::backend::{ChatBackend, GenerationParams, transport_error};

/// Chat-completions integration: the OpenAI-compatible `/chat/completions`
/// shape that hosted Hugging Face models answer behind a bearer token.
pub struct CompletionBackend {
    http: reqwest::Client,
    base_url: String,
    model: String,
    token: String,
}

impl CompletionBackend {
    pub fn new(http: reqwest::Client, base_url: String, model: String, token: String) -> Self {
        Self { http, base_url, model, token }
    }

    fn request_body<'a>(
        &'a self,
        system: Option<&'a str>,
        turns: &'a [Turn],
        params: &GenerationParams,
    ) -> CompletionRequest<'a> {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        if let Some(system) = system {
            messages.push(WireMessage { role: "system", content: system });
        }
        for turn in turns {
            messages.push(WireMessage { role: turn.role.as_str(), content: &turn.content });
        }
        CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
        }
    }
}

#[async_trait]
impl ChatBackend for CompletionBackend {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[Turn],
        params: &GenerationParams,
    ) -> Result<String, RelayError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(system, turns, params);
        tracing::debug!(
            model = %self.model,
            turns = turns.len(),
            max_tokens = params.max_tokens,
            "requesting chat completion"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "chat completion request failed");
            return Err(RelayError::RemoteError { status: status.as_u16(), body });
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|err| RelayError::MalformedResponse { reason: err.to_string() })?;
        completion.into_reply()
    }

    fn name(&self) -> &'static str {
        "completion"
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl CompletionResponse {
    fn into_reply(self) -> Result<String, RelayError> {
        let choice = self.choices.into_iter().next().ok_or_else(|| {
            RelayError::MalformedResponse { reason: "response carried no choices".to_string() }
        })?;
        choice.message.content.ok_or_else(|| {
            RelayError::MalformedResponse { reason: "choice carried no message content".to_string() }
        })
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
