// src/services/prediction.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RelayError;
use crate::message::Turn;
use crate::services::backend::{ChatBackend, GenerationParams, transport_error};

/// Route name the remote prediction app exposes.
const API_NAME: &str = "chat";

/// Routing flag the remote app surfaces as a model-select checkbox; the
/// relay always sends it enabled.
const MODEL_SELECT: bool = true;

/// Prediction integration: a generic `POST {base}/run/chat` endpoint that
/// takes the whole conversation as one flattened text payload plus routing
/// parameters and answers with plain text. Its wire format has no sampling
/// inputs, so the caller's sampling parameters are collected but not
/// forwarded.
pub struct PredictionBackend {
    http: reqwest::Client,
    base_url: String,
    model: String,
    modality: String,
}

impl PredictionBackend {
    pub fn new(http: reqwest::Client, base_url: String, model: String, modality: String) -> Self {
        Self { http, base_url, model, modality }
    }
}

#[async_trait]
impl ChatBackend for PredictionBackend {
    async fn generate(
        &self,
        system: Option<&str>,
        turns: &[Turn],
        _params: &GenerationParams,
    ) -> Result<String, RelayError> {
        let url = format!("{}/run/{}", self.base_url, API_NAME);
        let prompt = format_prompt(system, turns);
        let body = PredictionRequest {
            data: (
                MessagePayload { text: &prompt, files: [] },
                MODEL_SELECT,
                &self.model,
                &self.modality,
            ),
        };
        tracing::debug!(model = %self.model, turns = turns.len(), "requesting prediction");

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %body, "prediction request failed");
            return Err(RelayError::RemoteError { status: status.as_u16(), body });
        }

        let prediction: PredictionResponse = response
            .json()
            .await
            .map_err(|err| RelayError::MalformedResponse { reason: err.to_string() })?;
        prediction.into_reply()
    }

    fn name(&self) -> &'static str {
        "prediction"
    }
}

/// Flattens a conversation into the single text block the prediction
/// endpoint expects: optional system prompt, a `Conversation history:`
/// header with one `role: content` line per prior turn, then the new user
/// message as a `User:` line.
fn format_prompt(system: Option<&str>, turns: &[Turn]) -> String {
    let mut prompt = String::new();
    if let Some(system) = system {
        prompt.push_str(system);
        prompt.push_str("\n\n");
    }
    prompt.push_str("Conversation history:\n");
    if let Some((message, prior)) = turns.split_last() {
        for turn in prior {
            prompt.push_str(turn.role.as_str());
            prompt.push_str(": ");
            prompt.push_str(&turn.content);
            prompt.push('\n');
        }
        prompt.push_str("User: ");
        prompt.push_str(&message.content);
    }
    prompt
}

#[derive(Debug, Serialize)]
struct PredictionRequest<'a> {
    /// Positional arguments of the remote route: message payload, model
    /// select flag, model id, modality. Serialized as a JSON array.
    data: (MessagePayload<'a>, bool, &'a str, &'a str),
}

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    text: &'a str,
    files: [String; 0],
}

#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

impl PredictionResponse {
    fn into_reply(self) -> Result<String, RelayError> {
        match self.data.into_iter().next() {
            Some(serde_json::Value::String(text)) => Ok(text),
            Some(_) => Err(RelayError::MalformedResponse {
                reason: "prediction data was not text".to_string(),
            }),
            None => Err(RelayError::MalformedResponse {
                reason: "prediction carried no data".to_string(),
            }),
        }
    }
}
