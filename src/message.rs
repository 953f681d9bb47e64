// src/message.rs
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::i18n::Language;
use crate::services::backend::SamplingOverrides;

/// Speaker tag on a turn, serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One message of a conversation. Immutable once created; ordering within a
/// history is significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Body of `POST /chat/respond`: the caller owns the history and sends it
/// along with each message.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// Attachment stubs, accepted for wire compatibility and ignored.
    #[serde(default)]
    pub files: Vec<HashMap<String, String>>,
    #[serde(default)]
    pub history: Vec<Turn>,
    pub system_message: Option<String>,
    pub language: Option<Language>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl ChatRequest {
    pub fn sampling(&self) -> SamplingOverrides {
        SamplingOverrides {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub history: Vec<Turn>,
}

/// Body of `POST /respond`: the server owns the history, keyed by session.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub message: String,
    pub session_id: Option<String>,
    pub system_message: Option<String>,
    pub language: Option<Language>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl RespondRequest {
    pub fn sampling(&self) -> SamplingOverrides {
        SamplingOverrides {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RespondResponse {
    pub response: String,
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<Turn>,
}
