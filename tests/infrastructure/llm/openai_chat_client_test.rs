use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use ragline::application::ports::{ChatMessage, LlmClient, LlmClientError};
use ragline::infrastructure::llm::OpenAiChatClient;

use crate::helpers::spawn_fake_openai;

#[derive(Default)]
struct Captured {
    body: Option<Value>,
    authorization: Option<String>,
}

fn chat_router(captured: Arc<Mutex<Captured>>) -> Router {
    Router::new().route(
        "/chat/completions",
        post(move |headers: HeaderMap, Json(body): Json<Value>| {
            let captured = captured.clone();
            async move {
                let mut guard = captured.lock().await;
                guard.authorization = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(String::from);
                guard.body = Some(body);
                Json(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "  Solar.  " } }]
                }))
            }
        }),
    )
}

#[tokio::test]
async fn given_messages_when_completing_then_sends_model_roles_and_returns_content_verbatim() {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let base_url = spawn_fake_openai(chat_router(captured.clone())).await;
    let client = OpenAiChatClient::new("sk-test".to_string(), "gpt-4".to_string())
        .with_base_url(&format!("{}/", base_url))
        .with_sampling(0.0, Some(128));

    let answer = client
        .complete(&[
            ChatMessage::system("context here"),
            ChatMessage::user("question?"),
        ])
        .await
        .unwrap();

    assert_eq!(answer, "  Solar.  ");

    let guard = captured.lock().await;
    let body = guard.body.as_ref().unwrap();
    assert_eq!(body["model"], "gpt-4");
    assert_eq!(body["max_tokens"], 128);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "question?");
    assert_eq!(guard.authorization.as_deref(), Some("Bearer sk-test"));
}

#[tokio::test]
async fn given_no_max_tokens_when_completing_then_field_is_omitted() {
    let captured = Arc::new(Mutex::new(Captured::default()));
    let base_url = spawn_fake_openai(chat_router(captured.clone())).await;
    let client = OpenAiChatClient::new("sk-test".to_string(), "gpt-4".to_string())
        .with_base_url(&base_url);

    client.complete(&[ChatMessage::user("hi")]).await.unwrap();

    let guard = captured.lock().await;
    assert!(guard.body.as_ref().unwrap().get("max_tokens").is_none());
}

#[tokio::test]
async fn given_rate_limited_api_when_completing_then_returns_rate_limited() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { (StatusCode::TOO_MANY_REQUESTS, "quota") }),
    );
    let base_url = spawn_fake_openai(router).await;
    let client =
        OpenAiChatClient::new("sk-test".to_string(), "gpt-4".to_string()).with_base_url(&base_url);

    let result = client.complete(&[ChatMessage::user("hi")]).await;

    assert!(matches!(result, Err(LlmClientError::RateLimited)));
}

#[tokio::test]
async fn given_empty_choices_when_completing_then_returns_invalid_response() {
    let router = Router::new().route(
        "/chat/completions",
        post(|| async { Json(json!({ "choices": [] })) }),
    );
    let base_url = spawn_fake_openai(router).await;
    let client =
        OpenAiChatClient::new("sk-test".to_string(), "gpt-4".to_string()).with_base_url(&base_url);

    let result = client.complete(&[ChatMessage::user("hi")]).await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_unreachable_endpoint_when_completing_then_returns_request_failure() {
    let client = OpenAiChatClient::new("sk-test".to_string(), "gpt-4".to_string())
        .with_base_url("http://127.0.0.1:9");

    let result = client.complete(&[ChatMessage::user("hi")]).await;

    assert!(matches!(result, Err(LlmClientError::ApiRequestFailed(_))));
}
