//! One adapter per wire family.

mod anthropic;
mod gemini;
mod openai_compat;

pub use anthropic::AnthropicAdapter;
pub use gemini::GeminiAdapter;
pub use openai_compat::OpenAiCompatAdapter;

use crate::descriptor::WireFamily;
use crate::traits::Adapter;

static OPENAI_COMPAT: OpenAiCompatAdapter = OpenAiCompatAdapter;
static GEMINI: GeminiAdapter = GeminiAdapter;
static ANTHROPIC: AnthropicAdapter = AnthropicAdapter;

/// The adapter for a provider's declared wire family.
pub fn adapter_for(family: WireFamily) -> &'static dyn Adapter {
    match family {
        WireFamily::OpenAiCompatible => &OPENAI_COMPAT,
        WireFamily::Gemini => &GEMINI,
        WireFamily::Anthropic => &ANTHROPIC,
    }
}
