//! Command implementations.

pub mod chat;
pub mod exec;
pub mod providers;

use rota_core::RotationError;
use std::time::Duration;

/// One-line, user-facing description of a terminal failure.
pub fn describe_error(err: &RotationError) -> String {
    match err {
        RotationError::Configuration(reason) => format!(
            "No provider available ({reason}). Set an API key such as GROQ_API_KEY, \
             or start LM Studio or Ollama."
        ),
        RotationError::Exhausted { attempts, last } => {
            format!("All providers failed after {attempts} attempt(s). Last error: {last}")
        }
    }
}

/// Compact human duration: `42s`, `3m05s`.
pub fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs().max(1);
    if secs < 60 {
        format!("{secs}s")
    } else {
        format!("{}m{:02}s", secs / 60, secs % 60)
    }
}
