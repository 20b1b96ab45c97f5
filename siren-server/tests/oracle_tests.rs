//! Gemini client tests against a local stub server

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use siren_common::config::OracleSettings;
use siren_server::oracle::{ExtractionOracle, GeminiClient, OracleError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Last request the stub saw: api key header and JSON body
type Captured = Arc<Mutex<Option<(Option<String>, Value)>>>;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    delay: Duration,
    captured: Captured,
}

async fn generate_content(
    State(stub): State<Stub>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    *stub.captured.lock().unwrap() = Some((key, body));

    tokio::time::sleep(stub.delay).await;
    (stub.status, Json(stub.reply.clone()))
}

/// Start a stub on an ephemeral port; returns its endpoint URL
async fn spawn_stub(status: StatusCode, reply: Value, delay: Duration) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));
    let stub = Stub {
        status,
        reply,
        delay,
        captured: captured.clone(),
    };

    let app = Router::new()
        .route("/v1beta/models/test:generateContent", post(generate_content))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (
        format!("http://{}/v1beta/models/test:generateContent", addr),
        captured,
    )
}

fn client(endpoint: String, timeout: Duration) -> GeminiClient {
    let mut settings = OracleSettings::new("secret-key");
    settings.endpoint = endpoint;
    settings.timeout = timeout;
    GeminiClient::new(settings).unwrap()
}

#[tokio::test]
async fn test_generate_returns_first_text_part() {
    let reply = json!({
        "candidates": [{
            "content": {"parts": [{"text": "{\"department\": \"fire\"}"}], "role": "model"}
        }]
    });
    let (endpoint, captured) = spawn_stub(StatusCode::OK, reply, Duration::ZERO).await;
    let client = client(endpoint, Duration::from_secs(5));

    let text = client.generate("Extract this").await.unwrap();
    assert_eq!(text, "{\"department\": \"fire\"}");

    let (key, body) = captured.lock().unwrap().take().unwrap();
    assert_eq!(key.as_deref(), Some("secret-key"));
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Extract this");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
}

#[tokio::test]
async fn test_generate_error_status() {
    let reply = json!({"error": {"code": 403, "message": "API key not valid"}});
    let (endpoint, _captured) = spawn_stub(StatusCode::FORBIDDEN, reply, Duration::ZERO).await;
    let client = client(endpoint, Duration::from_secs(5));

    match client.generate("Extract this").await {
        Err(OracleError::Status { status, body }) => {
            assert_eq!(status, 403);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generate_empty_candidates() {
    let (endpoint, _captured) =
        spawn_stub(StatusCode::OK, json!({"candidates": []}), Duration::ZERO).await;
    let client = client(endpoint, Duration::from_secs(5));

    let result = client.generate("Extract this").await;
    assert!(matches!(result, Err(OracleError::NoCandidate(_))));
}

#[tokio::test]
async fn test_generate_timeout() {
    let (endpoint, _captured) =
        spawn_stub(StatusCode::OK, json!({"candidates": []}), Duration::from_secs(3)).await;
    let client = client(endpoint, Duration::from_millis(200));

    let result = client.generate("Extract this").await;
    assert!(matches!(result, Err(OracleError::Timeout)));
}

#[tokio::test]
async fn test_generate_unreachable_endpoint() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(format!("http://{}/generate", addr), Duration::from_secs(2));
    let result = client.generate("Extract this").await;
    assert!(matches!(result, Err(OracleError::Network(_))));
}
