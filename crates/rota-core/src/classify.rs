//! Map one attempt's result onto a rotation outcome.

use crate::error::AttemptError;
use rota_provider::ProviderError;

/// Error text that signals rate limiting, matched case-insensitively.
const RATE_LIMIT_PHRASES: [&str; 4] = ["rate limit", "too many requests", "429", "quota exceeded"];

/// What the executor does next with a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Reply text; the rotation ends.
    Success(String),
    /// Cool the provider down, exclude it, continue.
    RateLimited(AttemptError),
    /// Exclude the provider, continue.
    Failed(AttemptError),
}

/// Whether `text` carries a rate-limit signal.
pub fn is_rate_limit_message(text: &str) -> bool {
    let lower = text.to_lowercase();
    RATE_LIMIT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

/// Classify the result of sending to `provider`.
///
/// HTTP 429 is a rate limit. So is a response whose body mentions rate
/// limiting. Only text the provider sent is matched; transport errors and
/// timeouts are transient whatever their message says.
pub fn classify(provider: &str, result: Result<String, ProviderError>) -> AttemptOutcome {
    let err = match result {
        Ok(text) => return AttemptOutcome::Success(text),
        Err(err) => err,
    };

    let rate_limited = match &err {
        ProviderError::Api { status, body } => *status == 429 || is_rate_limit_message(body),
        ProviderError::InvalidResponse(text) => is_rate_limit_message(text),
        ProviderError::Http(_) => err.status() == Some(429),
        ProviderError::Timeout(_) | ProviderError::Serialization(_) => false,
    };

    let message = err.to_string();

    let provider = provider.to_string();
    if rate_limited {
        AttemptOutcome::RateLimited(AttemptError::RateLimited { provider, message })
    } else {
        AttemptOutcome::Failed(AttemptError::Transient { provider, message })
    }
}
