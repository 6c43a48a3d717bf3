//! Google Gemini `generateContent` adapter.
//!
//! Gemini calls the assistant role `model`, carries system text in a separate
//! `systemInstruction`, and expects strictly alternating turns, so adjacent
//! messages with the same role are merged into one multi-part content. The key
//! travels as a `?key=` query parameter rather than a header.

use crate::descriptor::WireFamily;
use crate::error::ProviderError;
use crate::traits::Adapter;
use crate::types::{ChatMessage, ChatOptions, Endpoint, Role};
use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::Deserialize;
use serde_json::{json, Value};

/// Adapter for `POST {base}/{model}:generateContent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeminiAdapter;

impl GeminiAdapter {
    fn wire_role(role: Role) -> &'static str {
        match role {
            Role::Assistant => "model",
            Role::User | Role::System => "user",
        }
    }

    /// Split system text out and fold the rest into alternating contents.
    fn convert_messages(messages: &[ChatMessage]) -> (Option<String>, Vec<Value>) {
        let system: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();

        let mut contents: Vec<(&'static str, Vec<Value>)> = Vec::new();
        for msg in messages.iter().filter(|m| m.role != Role::System) {
            let role = Self::wire_role(msg.role);
            let part = json!({"text": msg.content});
            if let Some((last_role, parts)) = contents.last_mut() {
                if *last_role == role {
                    parts.push(part);
                    continue;
                }
            }
            contents.push((role, vec![part]));
        }

        let system = if system.is_empty() {
            None
        } else {
            Some(system.join("\n\n"))
        };
        let contents = contents
            .into_iter()
            .map(|(role, parts)| json!({"role": role, "parts": parts}))
            .collect();
        (system, contents)
    }
}

#[async_trait]
impl Adapter for GeminiAdapter {
    fn family(&self) -> WireFamily {
        WireFamily::Gemini
    }

    fn request_url(&self, endpoint: &Endpoint) -> String {
        format!(
            "{}/{}:generateContent",
            endpoint.base_url.trim().trim_end_matches('/'),
            endpoint.model
        )
    }

    fn build_request_body(
        &self,
        _endpoint: &Endpoint,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Value {
        let (system, contents) = Self::convert_messages(messages);
        let mut body = json!({ "contents": contents });

        if let Some(system) = system {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }

        let mut generation = serde_json::Map::new();
        if let Some(temperature) = options.temperature {
            generation.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(max_tokens) = options.max_tokens {
            generation.insert("maxOutputTokens".to_string(), json!(max_tokens));
        }
        if !generation.is_empty() {
            body["generationConfig"] = Value::Object(generation);
        }

        body
    }

    fn authorize(&self, request: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder {
        let credential = endpoint.credential.trim();
        if credential.is_empty() {
            request
        } else {
            request.query(&[("key", credential)])
        }
    }

    fn parse_response(&self, body: &Value) -> Result<String, ProviderError> {
        let resp: GeminiResponse = serde_json::from_value(body.clone())
            .map_err(|e| ProviderError::InvalidResponse(format!("unexpected shape: {e}")))?;

        resp.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| {
                ProviderError::InvalidResponse(
                    "missing candidates[0].content.parts[0].text".to_string(),
                )
            })
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}
