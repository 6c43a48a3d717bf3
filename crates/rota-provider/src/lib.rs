//! rota-provider: uniform chat model, provider descriptors and wire adapters.

pub mod catalog;
pub mod descriptor;
mod error;
pub mod providers;
pub mod traits;
pub mod types;

pub use catalog::builtin_providers;
pub use descriptor::{ProviderDescriptor, Tier, WireFamily};
pub use error::ProviderError;
pub use providers::{adapter_for, AnthropicAdapter, GeminiAdapter, OpenAiCompatAdapter};
pub use traits::Adapter;
pub use types::{ChatMessage, ChatOptions, Endpoint, Role};
