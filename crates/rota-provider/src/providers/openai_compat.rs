//! Generic OpenAI-compatible adapter.
//!
//! Handles the chat completions format used by LM Studio, Ollama, Groq,
//! OpenRouter, DeepSeek, OpenAI and many other providers.

use crate::descriptor::WireFamily;
use crate::error::ProviderError;
use crate::traits::Adapter;
use crate::types::{ChatMessage, ChatOptions, Endpoint};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::{json, Value};

/// Adapter for `POST {base}/chat/completions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiCompatAdapter;

impl OpenAiCompatAdapter {
    /// Normalize a user-supplied base URL.
    ///
    /// Accepts URLs pasted with a trailing slash, the `/models` listing path,
    /// or the full `/chat/completions` path.
    pub fn normalize_base_url(base_url: &str) -> String {
        let mut url = base_url.trim().trim_end_matches('/');
        for suffix in ["/chat/completions", "/models"] {
            if let Some(stripped) = url.strip_suffix(suffix) {
                url = stripped.trim_end_matches('/');
            }
        }
        url.to_string()
    }

    /// Strip an accidental `Bearer ` prefix from a pasted key.
    pub fn normalize_credential(credential: &str) -> &str {
        let credential = credential.trim();
        credential
            .strip_prefix("Bearer ")
            .map(str::trim)
            .unwrap_or(credential)
    }

    /// Convert messages to OpenAI format.
    fn convert_messages(messages: &[ChatMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|msg| json!({"role": msg.role.as_str(), "content": msg.content}))
            .collect()
    }
}

#[async_trait]
impl Adapter for OpenAiCompatAdapter {
    fn family(&self) -> WireFamily {
        WireFamily::OpenAiCompatible
    }

    fn request_url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/chat/completions",
            Self::normalize_base_url(&endpoint.base_url)
        )
    }

    fn build_request_body(
        &self,
        endpoint: &Endpoint,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Value {
        let mut body = json!({
            "model": endpoint.model,
            "messages": Self::convert_messages(messages),
            "stream": false,
        });

        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(max_tokens) = options.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    fn authorize(&self, request: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
        let credential = Self::normalize_credential(&endpoint.credential);
        if credential.is_empty() {
            request
        } else {
            request.bearer_auth(credential)
        }
    }

    fn parse_response(&self, body: &Value) -> Result<String, ProviderError> {
        // Some gateways (OpenRouter among them) answer 200 with an error object.
        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ProviderError::InvalidResponse(format!("error payload: {message}")));
        }

        let resp: OpenAiResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::InvalidResponse(format!("unexpected shape: {e}")))?;

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::InvalidResponse("No choices in response".to_string()))?;

        choice
            .message
            .content
            .ok_or_else(|| ProviderError::InvalidResponse("choice has no message content".to_string()))
    }
}

// OpenAI response types for deserialization

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiResponseChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}
