//! rota-core: provider registry, cooldown tracking and the rotation engine.

pub mod classify;
pub mod config;
pub mod cooldown;
pub mod engine;
mod error;
pub mod registry;
pub mod selector;

pub use classify::{classify, AttemptOutcome};
pub use config::{Config, ConfigStore, CustomProvider, ProviderSettings, RoutingSettings, SoftBackoff};
pub use cooldown::{CooldownStatus, CooldownTracker, DEFAULT_COOLDOWN};
pub use engine::{Attempt, ChatResponse, OutcomeKind, ProviderStatus, RotationEngine};
pub use error::{AttemptError, ConfigError, RegistryError, RotationError};
pub use registry::{resolve, ProviderRegistry, Resolved};
pub use selector::{select, Candidate, ExcludeSet};
