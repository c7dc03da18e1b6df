//! Tests for the chat-completions client
//!
//! Most tests run against a one-shot local HTTP server. The live test requires
//! a real credential and makes a real API call:
//! 1. Put `OPENAI_API_KEY` (and, for Azure, `AZURE_OPENAI_ENDPOINT` and
//!    `MODEL_DEPLOYMENT`) in `.env`
//! 2. Run: `cargo test --test openai_client_test -- --ignored`

mod common;

use common::{spawn_mock_server, MockResponse};
use flowchart_api::config::AppConfig;
use flowchart_api::llm::{
    ChatMessage, CompletionRequest, Endpoint, GenerationConfig, LlmError, ModelClient,
    OpenAiClient,
};
use flowchart_api::service::FLOWCHART_SYSTEM_PROMPT;
use std::time::Duration;

const COMPLETION_BODY: &str = r#"{
    "id": "chatcmpl-1",
    "object": "chat.completion",
    "choices": [{
        "index": 0,
        "message": {"role": "assistant", "content": "@startuml\nstart\n:Login;\nstop\n@enduml"},
        "finish_reason": "stop"
    }]
}"#;

fn flowchart_request(model: &str) -> CompletionRequest {
    CompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(FLOWCHART_SYSTEM_PROMPT),
            ChatMessage::user("login flow"),
        ],
        config: GenerationConfig::new().with_max_tokens(400),
    }
}

fn openai_client(base_url: String, timeout: Duration) -> OpenAiClient {
    OpenAiClient::new(Endpoint::OpenAi { base_url }, "sk-test", timeout)
        .expect("Failed to create client")
}

#[tokio::test]
async fn test_openai_completion_success() {
    let (base_url, captured) = spawn_mock_server(MockResponse::json(200, COMPLETION_BODY)).await;
    let client = openai_client(base_url, Duration::from_secs(5));

    let text = client
        .complete(flowchart_request("gpt-4o"))
        .await
        .expect("completion failed");
    assert_eq!(text, "@startuml\nstart\n:Login;\nstop\n@enduml");

    let captured = captured.await.unwrap();
    assert_eq!(captured.request_line(), "POST /chat/completions HTTP/1.1");
    assert_eq!(captured.header("authorization").as_deref(), Some("Bearer sk-test"));
    assert!(captured.header("api-key").is_none());

    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(body["model"], "gpt-4o");
    assert_eq!(body["max_tokens"], 400);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], FLOWCHART_SYSTEM_PROMPT);
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "login flow");
}

#[tokio::test]
async fn test_azure_completion_routes_by_deployment() {
    let (endpoint, captured) = spawn_mock_server(MockResponse::json(200, COMPLETION_BODY)).await;
    let client = OpenAiClient::new(
        Endpoint::Azure {
            endpoint,
            api_version: "2024-06-01".to_string(),
        },
        "azure-key",
        Duration::from_secs(5),
    )
    .expect("Failed to create client");

    client
        .complete(flowchart_request("diagrams-gpt4o"))
        .await
        .expect("completion failed");

    let captured = captured.await.unwrap();
    assert_eq!(
        captured.request_line(),
        "POST /openai/deployments/diagrams-gpt4o/chat/completions?api-version=2024-06-01 HTTP/1.1"
    );
    assert_eq!(captured.header("api-key").as_deref(), Some("azure-key"));
    assert!(captured.header("authorization").is_none());

    let body: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert!(body.get("model").is_none());
}

#[tokio::test]
async fn test_error_status_is_reported_with_service_message() {
    let (base_url, _captured) = spawn_mock_server(MockResponse::json(
        401,
        r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error","code":"invalid_api_key"}}"#,
    ))
    .await;
    let client = openai_client(base_url, Duration::from_secs(5));

    let err = client.complete(flowchart_request("gpt-4o")).await.unwrap_err();
    match err {
        LlmError::HttpError { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Incorrect API key provided");
        }
        other => panic!("Expected HTTP error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let (base_url, _captured) = spawn_mock_server(
        MockResponse::json(200, COMPLETION_BODY).delayed(Duration::from_secs(3)),
    )
    .await;
    let client = openai_client(base_url, Duration::from_millis(300));

    let err = client.complete(flowchart_request("gpt-4o")).await.unwrap_err();
    assert!(matches!(err, LlmError::Timeout(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_malformed_completion_body() {
    let (base_url, _captured) =
        spawn_mock_server(MockResponse::json(200, r#"{"choices": "nope"}"#)).await;
    let client = openai_client(base_url, Duration::from_secs(5));

    let err = client.complete(flowchart_request("gpt-4o")).await.unwrap_err();
    assert!(matches!(err, LlmError::SerializationError(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_filtered_completion_is_empty_response() {
    let (base_url, _captured) = spawn_mock_server(MockResponse::json(
        200,
        r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null},"finish_reason":"content_filter"}]}"#,
    ))
    .await;
    let client = openai_client(base_url, Duration::from_secs(5));

    let err = client.complete(flowchart_request("gpt-4o")).await.unwrap_err();
    match err {
        LlmError::EmptyResponse(reason) => assert!(reason.contains("content_filter")),
        other => panic!("Expected empty response, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind and drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = openai_client(format!("http://{}", addr), Duration::from_secs(5));
    let err = client.complete(flowchart_request("gpt-4o")).await.unwrap_err();
    assert!(matches!(err, LlmError::Transport(_)), "got {:?}", err);
}

#[tokio::test]
#[ignore] // Run with --ignored flag since it requires a real credential
async fn test_live_flowchart_generation() {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().expect("OPENAI_API_KEY required in .env");
    let client = OpenAiClient::new(config.endpoint.clone(), &config.api_key, config.request_timeout)
        .expect("Failed to create client");

    let text = client
        .complete(flowchart_request(&config.model))
        .await
        .expect("live completion failed");

    println!("Response: {}", text);
    assert!(text.contains("@startuml"));
}
