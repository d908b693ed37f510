use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use minirag::connector::http::build_router;
use minirag::{
    ChatClient, Container, ContainerConfig, DomainError, JsonVectorRepository, MockChatClient,
    MockEmbedding,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

struct FailingChat;

#[async_trait]
impl ChatClient for FailingChat {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, DomainError> {
        Err(DomainError::generation("connection refused"))
    }
}

fn test_app_with_chat(chat: Arc<dyn ChatClient>) -> (axum::Router, TempDir) {
    let dir = tempdir().expect("tempdir");
    let container = Container::with_services(
        Arc::new(MockEmbedding::new()),
        Arc::new(JsonVectorRepository::new(dir.path().join("vector_store.json"))),
        chat,
        ContainerConfig::default(),
    );
    (build_router(Arc::new(container), &[]), dir)
}

fn test_app() -> (axum::Router, TempDir) {
    test_app_with_chat(Arc::new(MockChatClient::new()))
}

async fn send(app: &axum::Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn health_returns_ok() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn ingest_chat_delete_flow() {
    let (app, _dir) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/ingest",
        Some(json!({ "text": "Paris is the capital of France.", "source": "geo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "inserted": 1 }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "question": "What is the capital of France?", "topK": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let chunks = body["chunks"].as_array().expect("chunks");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0]["text"], "Paris is the capital of France.");
    assert_eq!(chunks[0]["source"], "geo");
    assert!(chunks[0]["score"].as_f64().expect("score") > 0.5);
    assert!(chunks[0]["id"].as_str().is_some());
    assert!(body["answer"]
        .as_str()
        .expect("answer")
        .contains("Paris is the capital of France."));

    let (status, body) = send(&app, Method::DELETE, "/api/sources/geo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "removed": 1, "remaining": 0, "source": "geo" }));

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "question": "What is the capital of France?" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("ingest"));
}

#[tokio::test]
async fn ingest_without_text_is_bad_request() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, Method::POST, "/api/ingest", Some(json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());

    let (status, _) = send(&app, Method::POST, "/api/ingest", Some(json!({ "source": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, _dir) = test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from("{ not json"))
        .expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_without_question_is_bad_request() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, Method::POST, "/api/chat", Some(json!({ "topK": 3 }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("question"));
}

#[tokio::test]
async fn chat_with_zero_top_k_is_bad_request() {
    let (app, _dir) = test_app();
    send(
        &app,
        Method::POST,
        "/api/ingest",
        Some(json!({ "text": "Paris is the capital of France." })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "question": "What is the capital of France?", "topK": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("error").contains("topK"));
}

#[tokio::test]
async fn delete_unknown_source_is_not_found_with_source() {
    let (app, _dir) = test_app();

    let (status, body) = send(&app, Method::DELETE, "/api/sources/my%20notes", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["source"], "my notes");
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn generation_failure_is_server_error_with_details() {
    let (app, _dir) = test_app_with_chat(Arc::new(FailingChat));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/ingest",
        Some(json!({ "text": "Paris is the capital of France." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/chat",
        Some(json!({ "question": "What is the capital of France?" })),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["details"]
        .as_str()
        .expect("details")
        .contains("connection refused"));

    let (_, stats) = send(&app, Method::GET, "/api/stats", None).await;
    assert_eq!(stats["chunks"], 1);
}

#[tokio::test]
async fn stats_report_sources() {
    let (app, _dir) = test_app();

    for (text, source) in [("Alpha note.", "a"), ("Beta note.", "b"), ("Gamma note.", "a")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/ingest",
            Some(json!({ "text": text, "source": source })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = send(&app, Method::GET, "/api/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["chunks"], 3);
    assert_eq!(
        body["sources"],
        json!([{ "source": "a", "chunks": 2 }, { "source": "b", "chunks": 1 }])
    );
}
