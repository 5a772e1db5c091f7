//! `OpenAiClient` against a local stand-in for the chat-completions API.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use careplan_llm::{CompletionClient, CompletionError, OpenAiClient, OpenAiConfig};
use serde_json::{json, Value};

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

fn client(base_url: String) -> OpenAiClient {
    OpenAiClient::new(OpenAiConfig {
        base_url,
        api_key: Some("sk-test".into()),
        model: "gpt-4o-mini".into(),
        temperature: 0.2,
        timeout_secs: 5,
    })
    .unwrap()
}

async fn echo_prompt(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer sk-test") {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
    }
    let prompt = body["messages"][0]["content"].clone();
    let model = body["model"].clone();
    (
        StatusCode::OK,
        Json(json!({
            "choices": [{"message": {"role": "assistant", "content": format!("{}|{}", model.as_str().unwrap_or_default(), prompt.as_str().unwrap_or_default())}}]
        })),
    )
}

#[tokio::test]
async fn returns_first_choice_content() {
    let base = serve(Router::new().route("/v1/chat/completions", post(echo_prompt))).await;
    let reply = client(base).complete("Breast cancer").await.unwrap();
    assert_eq!(reply.as_deref(), Some("gpt-4o-mini|Breast cancer"));
}

#[tokio::test]
async fn missing_content_is_none() {
    let base = serve(Router::new().route(
        "/v1/chat/completions",
        post(|| async { Json(json!({"choices": []})) }),
    ))
    .await;

    let reply = client(base).complete("x").await.unwrap();
    assert!(reply.is_none());
}

#[tokio::test]
async fn non_success_status_is_upstream_error() {
    let base = serve(Router::new().route(
        "/v1/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
    ))
    .await;

    match client(base).complete("x").await {
        Err(CompletionError::Upstream { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_parse_error() {
    let base = serve(Router::new().route(
        "/v1/chat/completions",
        post(|| async { "<html>gateway</html>" }),
    ))
    .await;

    let err = client(base).complete("x").await.unwrap_err();
    assert!(matches!(err, CompletionError::ResponseParsing(_)));
}
