mod common;

use common::MockBackend;

use chat_relay::message::{ChatResponse, HistoryResponse, RespondResponse, Turn};
use chat_relay::routes::create_router;
use chat_relay::services::relay::Exchange;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde::de::DeserializeOwned;
use tower::util::ServiceExt;

fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn stateless_round_extends_the_returned_history() {
    let backend = MockBackend::replying("Hi there!");
    let app = create_router().with_state(common::test_state(backend.clone()));

    let body = r#"{"message": "Hello", "history": [
        {"role": "user", "content": "Oi"},
        {"role": "assistant", "content": "Olá!"}
    ]}"#;
    let response = app.oneshot(post_json("/chat/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatResponse = read_json(response).await;
    assert_eq!(chat.response, "Hi there!");
    assert_eq!(
        chat.history,
        vec![
            Turn::user("Oi"),
            Turn::assistant("Olá!"),
            Turn::user("Hello"),
            Turn::assistant("Hi there!"),
        ]
    );

    let requests = backend.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].turns,
        vec![Turn::user("Oi"), Turn::assistant("Olá!"), Turn::user("Hello")]
    );
    assert_eq!(
        requests[0].system.as_deref(),
        Some("You are a helpful and friendly assistant.")
    );
}

#[tokio::test]
async fn first_round_builds_a_two_turn_history() {
    let backend = MockBackend::replying("Hi there");
    let app = create_router().with_state(common::test_state(backend));

    let response = app
        .oneshot(post_json("/chat/respond", r#"{"message": "Hello", "history": []}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatResponse = read_json(response).await;
    assert_eq!(
        chat.history,
        vec![Turn::user("Hello"), Turn::assistant("Hi there")]
    );
}

#[tokio::test]
async fn empty_message_gets_the_placeholder_and_no_backend_call() {
    let backend = MockBackend::replying("unused");
    let app = create_router().with_state(common::test_state(backend.clone()));

    let body = r#"{"message": "   ", "history": [{"role": "user", "content": "Oi"}]}"#;
    let response = app.oneshot(post_json("/chat/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatResponse = read_json(response).await;
    assert_eq!(chat.response, "Empty message, please send a valid message.");
    assert_eq!(chat.history, vec![Turn::user("Oi")]);
    assert_eq!(backend.calls().await, 0);
}

#[tokio::test]
async fn empty_message_placeholder_is_localized() {
    let backend = MockBackend::replying("unused");
    let app = create_router().with_state(common::test_state(backend));

    let body = r#"{"message": "", "language": "pt"}"#;
    let response = app.oneshot(post_json("/chat/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let chat: ChatResponse = read_json(response).await;
    assert_eq!(chat.response, "Mensagem vazia, por favor, envie uma mensagem válida.");
    assert!(chat.history.is_empty());
}

#[tokio::test]
async fn remote_failure_maps_to_a_localized_error_body() {
    let backend = MockBackend::failing();
    let app = create_router().with_state(common::test_state(backend));

    let body = r#"{"message": "Oi", "language": "pt"}"#;
    let response = app.oneshot(post_json("/chat/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error: serde_json::Value = read_json(response).await;
    assert_eq!(error["error"]["kind"], "remote_unavailable");
    let message = error["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Desculpe, ocorreu um erro: "));
    assert!(message.contains("verifique sua conexão"));
}

#[tokio::test]
async fn sampling_overrides_reach_the_backend() {
    let backend = MockBackend::replying("ok");
    let app = create_router().with_state(common::test_state(backend.clone()));

    let body = r#"{"message": "Hi", "max_tokens": 512, "temperature": 1.5, "top_p": 0.5}"#;
    let response = app.oneshot(post_json("/chat/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let requests = backend.requests.lock().await;
    assert_eq!(requests[0].params.max_tokens, 512);
    assert_eq!(requests[0].params.temperature, 1.5);
    assert_eq!(requests[0].params.top_p, 0.5);
}

#[tokio::test]
async fn session_round_trip_keeps_history_server_side() {
    let backend = MockBackend::replying("Tudo bem!");
    let app = create_router().with_state(common::test_state(backend.clone()));

    let response = app
        .clone()
        .oneshot(post_json("/respond", r#"{"message": "Oi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first: RespondResponse = read_json(response).await;
    assert_eq!(first.response, "Tudo bem!");
    assert!(!first.session_id.is_empty());

    let body = format!(
        r#"{{"message": "Que bom", "session_id": "{}"}}"#,
        first.session_id
    );
    let response = app.clone().oneshot(post_json("/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let second: RespondResponse = read_json(response).await;
    assert_eq!(second.session_id, first.session_id);

    // The second round saw the whole first round as context.
    {
        let requests = backend.requests.lock().await;
        assert_eq!(
            requests[1].turns,
            vec![
                Turn::user("Oi"),
                Turn::assistant("Tudo bem!"),
                Turn::user("Que bom"),
            ]
        );
    }

    let uri = format!("/history?session_id={}", first.session_id);
    let response = app.oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history: HistoryResponse = read_json(response).await;
    assert_eq!(
        history.history,
        vec![
            Turn::user("Oi"),
            Turn::assistant("Tudo bem!"),
            Turn::user("Que bom"),
            Turn::assistant("Tudo bem!"),
        ]
    );
}

#[tokio::test]
async fn failed_round_leaves_the_session_history_alone() {
    let backend = MockBackend::failing();
    let state = common::test_state(backend);
    let sid = state.sessions.create_session().await;
    state
        .sessions
        .append_exchange(
            &sid,
            &Exchange {
                user: Turn::user("Oi"),
                assistant: Turn::assistant("Olá!"),
            },
        )
        .await;
    let app = create_router().with_state(state);

    let body = format!(r#"{{"message": "Tudo bem?", "session_id": "{sid}"}}"#);
    let response = app.clone().oneshot(post_json("/respond", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .oneshot(get(&format!("/history?session_id={sid}")))
        .await
        .unwrap();
    let history: HistoryResponse = read_json(response).await;
    assert_eq!(
        history.history,
        vec![Turn::user("Oi"), Turn::assistant("Olá!")]
    );
}

#[tokio::test]
async fn unknown_session_history_reads_empty() {
    let app = create_router().with_state(common::test_state(MockBackend::replying("x")));

    let response = app
        .clone()
        .oneshot(get("/history?session_id=never-seen"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let history: HistoryResponse = read_json(response).await;
    assert!(history.history.is_empty());

    let response = app.oneshot(get("/history")).await.unwrap();
    let history: HistoryResponse = read_json(response).await;
    assert!(history.history.is_empty());
}

#[tokio::test]
async fn test_welcome_and_health_endpoints() {
    let app = create_router().with_state(common::test_state(MockBackend::replying("x")));

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let welcome: serde_json::Value = read_json(response).await;
    assert_eq!(welcome["message"], "Bem-vindo ao chat-relay!");

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn metrics_count_languages_and_outcomes() {
    let backend = MockBackend::replying("Hello!");
    let app = create_router().with_state(common::test_state(backend));

    let response = app
        .clone()
        .oneshot(post_json("/chat/respond", r#"{"message": "Hi"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let response = app
        .clone()
        .oneshot(post_json("/chat/respond", r#"{"message": "", "language": "pt"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let metrics: serde_json::Value = read_json(response).await;
    assert_eq!(metrics["language_usage"]["en"], 1);
    assert_eq!(metrics["language_usage"]["pt"], 1);
    assert_eq!(metrics["outcome_usage"]["ok"], 1);
    assert_eq!(metrics["outcome_usage"]["empty_message"], 1);
    assert_eq!(metrics["active_sessions"], 0);
}

#[tokio::test]
async fn i18n_exposes_both_locales() {
    let app = create_router().with_state(common::test_state(MockBackend::replying("x")));

    let response = app.oneshot(get("/i18n")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tables: serde_json::Value = read_json(response).await;
    assert_eq!(
        tables["pt"]["empty_message"],
        "Mensagem vazia, por favor, envie uma mensagem válida."
    );
    assert_eq!(tables["en"]["examples"].as_array().unwrap().len(), 4);
}
