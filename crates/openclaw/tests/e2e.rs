// SPDX-FileCopyrightText: 2026 OpenClaw Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end pipeline tests: gateway router over a real SQLite store and a
//! wiremock-backed OpenRouter endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use openclaw_context::ContextAssembler;
use openclaw_core::traits::{PassthroughVault, TaskStore};
use openclaw_gateway::{router, AuthConfig, GatewayState};
use openclaw_openrouter::OpenRouterClient;
use openclaw_router::CredentialResolver;
use openclaw_storage::SqliteTaskStore;
use openclaw_test_utils::MockFileStore;

const TOKEN: &str = "e2e-token";

struct Harness {
    app: axum::Router,
    store: Arc<SqliteTaskStore>,
    _dir: tempfile::TempDir,
}

async fn harness(upstream: &MockServer) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("openclaw.db");
    let store = Arc::new(
        SqliteTaskStore::open(db_path.to_str().unwrap(), true)
            .await
            .unwrap(),
    );

    let client = OpenRouterClient::new(
        &upstream.uri(),
        "https://openclaw.app",
        "OpenClaw",
        Duration::from_secs(5),
    )
    .unwrap();

    let state = GatewayState::new(
        store.clone(),
        Arc::new(MockFileStore::new()),
        Arc::new(PassthroughVault),
        Arc::new(client),
        CredentialResolver::new(Some(SecretString::from("sk-or-live".to_string()))),
        ContextAssembler::default(),
        Duration::from_secs(5),
        16,
        AuthConfig::new(Some(SecretString::from(TOKEN.to_string()))),
    );

    Harness {
        app: router(state),
        store,
        _dir: dir,
    }
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .header("x-openclaw-user", "user-1")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn sse_frames(body: &str) -> Vec<Value> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).unwrap())
        .collect()
}

fn sse_body(chunks: &[&str], with_sentinel: bool) -> String {
    let mut body = String::new();
    for chunk in chunks {
        body.push_str(&format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{chunk}\"}}}}]}}\n\n"
        ));
    }
    if with_sentinel {
        body.push_str("data: [DONE]\n\n");
    }
    body
}

#[tokio::test]
async fn full_conversation_round_trip() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-or-live"))
        .and(body_partial_json(json!({
            "model": "anthropic/claude-sonnet-4",
            "stream": true
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["Hello", " there"], true)),
        )
        .mount(&upstream)
        .await;

    let h = harness(&upstream).await;

    // First turn creates the task.
    let response = h
        .app
        .clone()
        .oneshot(post_json("/v1/chat/start", json!({"message": "Say hi"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let frames = sse_frames(&read_body(response).await);
    let task_id = frames[0]["taskId"].as_str().unwrap().to_string();
    assert_eq!(frames.last().unwrap()["done"], true);

    // Second turn continues it.
    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/v1/chat/send",
            json!({"taskId": task_id, "message": "Again"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let frames = sse_frames(&read_body(response).await);
    assert_eq!(frames.last().unwrap()["done"], true);

    // Four messages in order, assistant replies assembled from the deltas.
    let mut messages = h.store.load_recent_messages(&task_id, 50).await.unwrap();
    messages.reverse();
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0].content, "Say hi");
    assert_eq!(messages[1].content, "Hello there");
    assert_eq!(messages[2].content, "Again");
    assert_eq!(messages[3].content, "Hello there");

    // The second request carried the conversation history upstream.
    let requests = upstream.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
    let wire_messages = second["messages"].as_array().unwrap();
    assert_eq!(wire_messages.len(), 4, "system + two prior turns + current");
    assert_eq!(wire_messages[1]["content"], "Say hi");
    assert_eq!(wire_messages[2]["content"], "Hello there");
    assert_eq!(wire_messages[3]["content"], "Again");
}

#[tokio::test]
async fn stream_without_sentinel_still_persists() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body(&["cut", " off"], false)),
        )
        .mount(&upstream)
        .await;

    let h = harness(&upstream).await;
    let response = h
        .app
        .clone()
        .oneshot(post_json("/v1/chat/start", json!({"message": "hello?"})))
        .await
        .unwrap();
    let frames = sse_frames(&read_body(response).await);

    let task_id = frames[0]["taskId"].as_str().unwrap();
    assert_eq!(frames.last().unwrap()["done"], true);

    let mut messages = h.store.load_recent_messages(task_id, 50).await.unwrap();
    messages.reverse();
    assert_eq!(messages[1].content, "cut off");
    assert_eq!(messages[1].role, "assistant");
}

#[tokio::test]
async fn upstream_failure_maps_to_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider exploded"))
        .mount(&upstream)
        .await;

    let h = harness(&upstream).await;
    let response = h
        .app
        .clone()
        .oneshot(post_json("/v1/chat/start", json!({"message": "hi"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(body["error"], "Failed to get response from AI model");
}
