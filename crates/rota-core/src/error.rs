//! Error types for the rota-core crate.

/// Classified failure of one attempt against one provider.
///
/// These are retry signals inside a rotation; callers only ever see the last
/// one, wrapped in [`RotationError::Exhausted`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttemptError {
    /// Provider signalled rate limiting; it is put into cooldown.
    #[error("{provider} is rate limited: {message}")]
    RateLimited { provider: String, message: String },

    /// Timeout, 5xx, transport or parse failure; the provider is only skipped.
    #[error("{provider} failed: {message}")]
    Transient { provider: String, message: String },
}

impl AttemptError {
    /// Provider the attempt was sent to.
    pub fn provider(&self) -> &str {
        match self {
            AttemptError::RateLimited { provider, .. } | AttemptError::Transient { provider, .. } => {
                provider
            }
        }
    }

    /// Whether this failure put the provider into cooldown.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AttemptError::RateLimited { .. })
    }
}

/// Errors returned from a rotation.
#[derive(Debug, thiserror::Error)]
pub enum RotationError {
    /// No provider is usable at all; raised before any network call.
    #[error("No provider available: {0}")]
    Configuration(String),

    /// Every eligible provider failed or the attempt cap was reached.
    #[error("All providers failed after {attempts} attempt(s). Last error: {last}")]
    Exhausted { attempts: usize, last: AttemptError },
}

impl RotationError {
    /// The last classified attempt error, if any attempt was made.
    pub fn last_attempt(&self) -> Option<&AttemptError> {
        match self {
            RotationError::Configuration(_) => None,
            RotationError::Exhausted { last, .. } => Some(last),
        }
    }
}

/// Invalid provider declarations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two providers share a name.
    #[error("Duplicate provider name: {0}")]
    DuplicateName(String),

    /// Two providers share a priority.
    #[error("Providers {first} and {second} share priority {priority}")]
    DuplicatePriority {
        priority: u32,
        first: String,
        second: String,
    },
}

/// Errors reading or writing the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
