//! Anthropic Messages API adapter.

use crate::descriptor::WireFamily;
use crate::error::ProviderError;
use crate::traits::Adapter;
use crate::types::{ChatMessage, ChatOptions, Endpoint, Role};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::{json, Value};

const API_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 4_096;

/// Adapter for `POST {base}/v1/messages`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicAdapter;

impl AnthropicAdapter {
    /// Convert a message to the Anthropic JSON format.
    fn convert_message(msg: &ChatMessage) -> Option<Value> {
        // Anthropic only accepts "user" and "assistant" roles in messages
        let role = match msg.role {
            Role::User | Role::Assistant => msg.role.as_str(),
            Role::System => return None, // System is handled separately
        };

        Some(json!({
            "role": role,
            "content": [{"type": "text", "text": msg.content}],
        }))
    }
}

#[async_trait]
impl Adapter for AnthropicAdapter {
    fn family(&self) -> WireFamily {
        WireFamily::Anthropic
    }

    fn request_url(&self, endpoint: &Endpoint) -> String {
        let base = endpoint.base_url.trim().trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);
        format!("{base}/v1/messages")
    }

    fn build_request_body(
        &self,
        endpoint: &Endpoint,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Value {
        let converted: Vec<Value> = messages.iter().filter_map(Self::convert_message).collect();

        let mut body = json!({
            "model": endpoint.model,
            "messages": converted,
            "max_tokens": options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "stream": false,
        });

        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        if !system.is_empty() {
            body["system"] = json!(system.join("\n\n"));
        }

        if let Some(temperature) = options.temperature {
            body["temperature"] = json!(temperature);
        }

        body
    }

    fn authorize(&self, request: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
        request
            .header("x-api-key", endpoint.credential.trim())
            .header("anthropic-version", API_VERSION)
    }

    fn parse_response(&self, body: &Value) -> Result<String, ProviderError> {
        let resp: AnthropicResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::InvalidResponse(format!("unexpected shape: {e}")))?;

        let texts: Vec<String> = resp
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();

        if texts.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "no text blocks in response".to_string(),
            ));
        }
        Ok(texts.concat())
    }
}

// ──────────────────────────────────────────────────────────
// Response types
// ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}
