//! Static provider descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Display grouping for a provider. Does not influence selection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Inference server on this machine, no credential needed.
    Local,
    /// Free-tier cloud API.
    Free,
    /// Paid cloud API.
    Paid,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Tier::Local => "local",
            Tier::Free => "free",
            Tier::Paid => "paid",
        })
    }
}

/// Wire format spoken by a provider. Selects the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WireFamily {
    /// `POST /chat/completions` with `choices[0].message.content`.
    #[serde(rename = "openai-compatible", alias = "openai")]
    OpenAiCompatible,
    /// Google `:generateContent` with `candidates[0].content.parts[0].text`.
    Gemini,
    /// Anthropic `POST /v1/messages`.
    Anthropic,
}

impl fmt::Display for WireFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            WireFamily::OpenAiCompatible => "openai-compatible",
            WireFamily::Gemini => "gemini",
            WireFamily::Anthropic => "anthropic",
        })
    }
}

/// Immutable description of one backend provider.
///
/// Only the resolved values (URL, model, credential) come from configuration,
/// and they are re-read on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Unique provider name, also the configuration section name.
    pub name: String,
    /// Display tier.
    pub tier: Tier,
    /// Unique priority; lower is tried earlier.
    pub priority: u32,
    /// Wire format.
    pub family: WireFamily,
    /// Default base URL, used when configuration has no override.
    pub base_url: String,
    /// Settings section holding the credential. `None` for local providers.
    pub credential_key: Option<String>,
    /// Settings section holding the model override.
    pub model_key: String,
    /// Model used when configuration has no override.
    pub default_model: String,
    /// Advertised requests per minute. Informational only.
    pub rate_limit_rpm: Option<u32>,
}

impl ProviderDescriptor {
    /// Describe a provider whose settings all live under its own name.
    pub fn new(
        name: impl Into<String>,
        tier: Tier,
        priority: u32,
        family: WireFamily,
        base_url: impl Into<String>,
        default_model: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let credential_key = match tier {
            Tier::Local => None,
            Tier::Free | Tier::Paid => Some(name.clone()),
        };
        Self {
            model_key: name.clone(),
            name,
            tier,
            priority,
            family,
            base_url: base_url.into(),
            credential_key,
            default_model: default_model.into(),
            rate_limit_rpm: None,
        }
    }

    /// Attach a soft requests-per-minute hint.
    pub fn with_rate_limit(mut self, rpm: u32) -> Self {
        self.rate_limit_rpm = Some(rpm);
        self
    }

    /// Whether this provider runs without a credential.
    pub fn is_local(&self) -> bool {
        self.tier == Tier::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_has_no_credential_key() {
        let d = ProviderDescriptor::new(
            "lm_studio",
            Tier::Local,
            10,
            WireFamily::OpenAiCompatible,
            "http://localhost:1234/v1",
            "local-model",
        );
        assert!(d.is_local());
        assert!(d.credential_key.is_none());
        assert_eq!(d.model_key, "lm_studio");
    }

    #[test]
    fn test_cloud_credential_key_defaults_to_name() {
        let d = ProviderDescriptor::new(
            "groq",
            Tier::Free,
            30,
            WireFamily::OpenAiCompatible,
            "https://api.groq.com/openai/v1",
            "llama3-70b-8192",
        )
        .with_rate_limit(30);
        assert_eq!(d.credential_key.as_deref(), Some("groq"));
        assert_eq!(d.rate_limit_rpm, Some(30));
    }

    #[test]
    fn test_family_serde_names() {
        let family: WireFamily = serde_json::from_str("\"openai-compatible\"").unwrap();
        assert_eq!(family, WireFamily::OpenAiCompatible);
        assert_eq!(serde_json::to_string(&Tier::Paid).unwrap(), "\"paid\"");
    }
}
