//! Built-in provider catalog.
//!
//! Local servers come first, then free-tier cloud APIs, then paid ones.
//! Priorities leave gaps so custom providers can be slotted in between.

use crate::descriptor::{ProviderDescriptor, Tier, WireFamily};

const LM_STUDIO_BASE_URL: &str = "http://localhost:1234/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const ZHIPU_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
const DEEPSEEK_BASE_URL: &str = "https://api.deepseek.com";
const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

/// Every provider this build knows about, in priority order.
pub fn builtin_providers() -> Vec<ProviderDescriptor> {
    use WireFamily::{Anthropic, Gemini, OpenAiCompatible};

    vec![
        ProviderDescriptor::new(
            "lm_studio",
            Tier::Local,
            10,
            OpenAiCompatible,
            LM_STUDIO_BASE_URL,
            "local-model",
        ),
        ProviderDescriptor::new(
            "ollama",
            Tier::Local,
            20,
            OpenAiCompatible,
            OLLAMA_BASE_URL,
            "llama3",
        ),
        ProviderDescriptor::new(
            "groq",
            Tier::Free,
            30,
            OpenAiCompatible,
            GROQ_BASE_URL,
            "llama3-70b-8192",
        )
        .with_rate_limit(30),
        ProviderDescriptor::new("gemini", Tier::Free, 40, Gemini, GEMINI_BASE_URL, "gemini-pro")
            .with_rate_limit(15),
        ProviderDescriptor::new(
            "openrouter",
            Tier::Free,
            50,
            OpenAiCompatible,
            OPENROUTER_BASE_URL,
            "mistralai/mistral-7b-instruct",
        )
        .with_rate_limit(20),
        ProviderDescriptor::new(
            "zhipu",
            Tier::Free,
            60,
            OpenAiCompatible,
            ZHIPU_BASE_URL,
            "glm-4",
        ),
        ProviderDescriptor::new(
            "deepseek",
            Tier::Paid,
            70,
            OpenAiCompatible,
            DEEPSEEK_BASE_URL,
            "deepseek-chat",
        ),
        ProviderDescriptor::new(
            "mistral",
            Tier::Paid,
            80,
            OpenAiCompatible,
            MISTRAL_BASE_URL,
            "mistral-large-latest",
        ),
        ProviderDescriptor::new(
            "openai",
            Tier::Paid,
            90,
            OpenAiCompatible,
            OPENAI_BASE_URL,
            "gpt-4o-mini",
        ),
        ProviderDescriptor::new(
            "anthropic",
            Tier::Paid,
            100,
            Anthropic,
            ANTHROPIC_BASE_URL,
            "claude-3-5-sonnet-latest",
        ),
    ]
}
