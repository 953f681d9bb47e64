use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::{
    error::{ApiError, RelayError},
    i18n,
    message::{
        ChatRequest, ChatResponse, HistoryQuery, HistoryResponse, RespondRequest,
        RespondResponse,
    },
    services::relay::RespondOptions,
    state::SharedState,
};

// Fixed welcome payload, kept verbatim for clients that probe the root.
pub async fn welcome_handler() -> Json<serde_json::Value> {
    Json(json!({ "message": "Bem-vindo ao chat-relay!" }))
}

/// Stateless round: the caller carries the conversation and sends it back
/// with every request. An empty message is not an error for the caller; it
/// gets the localized placeholder and the history back untouched.
pub async fn chat_respond_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let language = payload.language.unwrap_or_default();
    state.metrics.increment_language(language.as_str()).await;

    let labels = i18n::translations(language);
    let options = RespondOptions {
        system_message: Some(
            payload
                .system_message
                .clone()
                .unwrap_or_else(|| labels.system_message.to_string()),
        ),
        sampling: payload.sampling(),
    };

    let result = state
        .relay
        .respond(&payload.history, &payload.message, &options)
        .await;
    match result {
        Ok(exchange) => {
            state.metrics.increment_outcome("ok").await;
            let response = exchange.assistant.content.clone();
            let mut history = payload.history;
            history.push(exchange.user);
            history.push(exchange.assistant);
            Ok(Json(ChatResponse { response, history }))
        }
        Err(RelayError::EmptyMessage) => {
            state
                .metrics
                .increment_outcome(RelayError::EmptyMessage.kind())
                .await;
            Ok(Json(ChatResponse {
                response: labels.empty_message.to_string(),
                history: payload.history,
            }))
        }
        Err(err) => {
            state.metrics.increment_outcome(err.kind()).await;
            Err(ApiError::new(err, language))
        }
    }
}

/// Session-scoped round: history lives server-side under a session id. A
/// request without one starts a fresh session; the id comes back in the
/// response so the caller can continue the conversation.
pub async fn respond_handler(
    State(state): State<SharedState>,
    Json(payload): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, ApiError> {
    let language = payload.language.unwrap_or_default();
    state.metrics.increment_language(language.as_str()).await;

    let session_id = match &payload.session_id {
        Some(s) if !s.trim().is_empty() => state.sessions.ensure_session(s).await,
        _ => state.sessions.create_session().await,
    };

    let labels = i18n::translations(language);
    let history = state.sessions.history(&session_id).await.unwrap_or_default();
    let options = RespondOptions {
        system_message: Some(
            payload
                .system_message
                .clone()
                .unwrap_or_else(|| labels.system_message.to_string()),
        ),
        sampling: payload.sampling(),
    };

    let result = state.relay.respond(&history, &payload.message, &options).await;
    match result {
        Ok(exchange) => {
            state.metrics.increment_outcome("ok").await;
            state.sessions.append_exchange(&session_id, &exchange).await;
            Ok(Json(RespondResponse {
                response: exchange.assistant.content,
                session_id,
            }))
        }
        // The session stays exactly as it was: no placeholder turn, no
        // touched timestamp beyond the ensure above.
        Err(RelayError::EmptyMessage) => {
            state
                .metrics
                .increment_outcome(RelayError::EmptyMessage.kind())
                .await;
            Ok(Json(RespondResponse {
                response: labels.empty_message.to_string(),
                session_id,
            }))
        }
        Err(err) => {
            state.metrics.increment_outcome(err.kind()).await;
            Err(ApiError::new(err, language))
        }
    }
}

// Server-side history for a session; unknown or absent ids read as empty.
pub async fn get_history_handler(
    State(state): State<SharedState>,
    Query(query): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let history = match &query.session_id {
        Some(id) => state.sessions.history(id).await.unwrap_or_default(),
        None => Vec::new(),
    };
    Json(HistoryResponse { history })
}

// Full translation tables, fetched once by the browser UI.
pub async fn get_i18n_handler() -> Json<serde_json::Value> {
    Json(json!({
        "en": i18n::EN,
        "pt": i18n::PT,
    }))
}

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<serde_json::Value> {
    let metrics = state.metrics.get_metrics().await;
    Json(json!({
        "language_usage": metrics.language_usage,
        "outcome_usage": metrics.outcome_usage,
        "active_sessions": state.sessions.len().await,
    }))
}
