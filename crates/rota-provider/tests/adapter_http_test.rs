//! HTTP-level adapter tests against a local mock server.

use reqwest::Client;
use rota_provider::*;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn endpoint(server: &MockServer, base_path: &str, model: &str, credential: &str) -> Endpoint {
    Endpoint {
        provider: "mock".to_string(),
        base_url: format!("{}{}", server.uri(), base_path),
        model: model.to_string(),
        credential: credential.to_string(),
    }
}

#[tokio::test]
async fn test_openai_compat_sends_bearer_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "hello"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = OpenAiCompatAdapter
        .send(
            &Client::new(),
            &endpoint(&server, "/v1", "m", "Bearer test-key"),
            &[ChatMessage::user("hi")],
            &ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(text, "hello");
}

#[tokio::test]
async fn test_openai_compat_local_sends_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "local"}}]
        })))
        .mount(&server)
        .await;

    let text = OpenAiCompatAdapter
        .send(
            &Client::new(),
            &endpoint(&server, "/v1/models", "local-model", ""),
            &[ChatMessage::user("hi")],
            &ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(text, "local");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "local-model");
    assert_eq!(body["stream"], false);
}

#[tokio::test]
async fn test_non_success_status_keeps_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string("{\"error\":\"Rate limit reached\"}"),
        )
        .mount(&server)
        .await;

    let err = OpenAiCompatAdapter
        .send(
            &Client::new(),
            &endpoint(&server, "/v1", "m", "k"),
            &[ChatMessage::user("hi")],
            &ChatOptions::default(),
        )
        .await
        .unwrap_err();

    match err {
        ProviderError::Api { status, body } => {
            assert_eq!(status, 429);
            assert!(body.contains("Rate limit"));
        }
        other => panic!("Expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_json_success_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = OpenAiCompatAdapter
        .send(
            &Client::new(),
            &endpoint(&server, "/v1", "m", "k"),
            &[ChatMessage::user("hi")],
            &ChatOptions::default(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_gemini_key_in_query_not_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("key", "g-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "answer"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = GeminiAdapter
        .send(
            &Client::new(),
            &endpoint(&server, "/v1beta/models", "gemini-pro", "g-key"),
            &[ChatMessage::system("short"), ChatMessage::user("q")],
            &ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(text, "answer");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "short");
}

#[tokio::test]
async fn test_anthropic_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-ant"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "claude says hi"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let text = AnthropicAdapter
        .send(
            &Client::new(),
            &endpoint(&server, "", "claude", "sk-ant"),
            &[ChatMessage::user("hi")],
            &ChatOptions::default(),
        )
        .await
        .unwrap();
    assert_eq!(text, "claude says hi");
}

#[tokio::test]
async fn test_transport_error_hides_gemini_key() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let unreachable = Endpoint {
        provider: "gemini".to_string(),
        base_url: format!("http://127.0.0.1:{port}/v1beta/models"),
        model: "gemini-pro".to_string(),
        credential: "AIzaSECRETKEY".to_string(),
    };
    let err = GeminiAdapter
        .send(
            &Client::new(),
            &unreachable,
            &[ChatMessage::user("q")],
            &ChatOptions::default(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Http(_)));
    assert!(!err.to_string().contains("AIzaSECRETKEY"), "{err}");
    assert!(!format!("{err:?}").contains("AIzaSECRETKEY"), "{err:?}");
}
