//! Adapter trait definition.

use crate::descriptor::WireFamily;
use crate::error::ProviderError;
use crate::types::{ChatMessage, ChatOptions, Endpoint};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// Translation between the uniform message model and one wire family.
///
/// Implementations are stateless; the routing layer picks one per call from
/// the provider descriptor's [`WireFamily`] and hands it a resolved
/// [`Endpoint`]. The request/response halves are plain functions so they can
/// be tested without a network; [`Adapter::send`] glues them to HTTP.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Wire family this adapter speaks.
    fn family(&self) -> WireFamily;

    /// Full request URL, without credentials.
    fn request_url(&self, endpoint: &Endpoint) -> String;

    /// JSON request body.
    fn build_request_body(
        &self,
        endpoint: &Endpoint,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Value;

    /// Attach the credential the way this family expects it.
    fn authorize(&self, request: RequestBuilder, endpoint: &Endpoint) -> RequestBuilder;

    /// Extract the reply text from a successful response body.
    fn parse_response(&self, body: &Value) -> Result<String, ProviderError>;

    /// Send one request and return the normalized reply text.
    ///
    /// Non-2xx responses become [`ProviderError::Api`] with the raw body so
    /// the caller can classify rate limits. Transport errors drop the URL,
    /// which may carry a credential in its query string.
    async fn send(
        &self,
        client: &Client,
        endpoint: &Endpoint,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, ProviderError> {
        let url = self.request_url(endpoint);
        let body = self.build_request_body(endpoint, messages, options);
        tracing::debug!(provider = %endpoint.provider, %url, model = %endpoint.model, "sending request");

        let request = client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);

        let response = self
            .authorize(request, endpoint)
            .send()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Http(e.without_url()))?;

        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::InvalidResponse(format!("body is not JSON: {e}")))?;
        self.parse_response(&payload)
    }
}

// Compile-time check: Adapter must be object-safe
const _: () = {
    fn _assert_object_safe(_: &dyn Adapter) {}
};
