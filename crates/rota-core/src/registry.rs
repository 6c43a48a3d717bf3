//! Priority-ordered provider registry and per-call resolution.

use crate::config::Config;
use crate::error::RegistryError;
use rota_provider::{builtin_providers, Endpoint, ProviderDescriptor};
use std::collections::HashSet;

/// Immutable, priority-sorted list of provider descriptors.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderDescriptor>,
}

/// A descriptor resolved against the current configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Local, or credentialed, and not disabled.
    pub available: bool,
    /// URL, model and credential to use for this call.
    pub endpoint: Endpoint,
}

impl ProviderRegistry {
    /// Build a registry, rejecting duplicate names or priorities.
    pub fn new(mut providers: Vec<ProviderDescriptor>) -> Result<Self, RegistryError> {
        providers.sort_by_key(|p| p.priority);

        let mut names = HashSet::new();
        for p in &providers {
            if !names.insert(p.name.as_str()) {
                return Err(RegistryError::DuplicateName(p.name.clone()));
            }
        }
        for pair in providers.windows(2) {
            if pair[0].priority == pair[1].priority {
                return Err(RegistryError::DuplicatePriority {
                    priority: pair[0].priority,
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        Ok(Self { providers })
    }

    /// The built-in catalog.
    pub fn builtin() -> Self {
        let mut providers = builtin_providers();
        providers.sort_by_key(|p| p.priority);
        Self { providers }
    }

    /// The built-in catalog plus any `custom_providers` from configuration.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut providers = builtin_providers();
        providers.extend(config.custom_providers.iter().map(|c| {
            ProviderDescriptor::new(
                c.name.clone(),
                c.tier,
                c.priority,
                c.family,
                c.base_url.clone(),
                c.default_model.clone(),
            )
        }));
        Self::new(providers)
    }

    /// Providers in ascending priority order.
    pub fn providers(&self) -> &[ProviderDescriptor] {
        &self.providers
    }

    /// Look up a provider by name.
    pub fn get(&self, name: &str) -> Option<&ProviderDescriptor> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Provider names in priority order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Resolve `descriptor` against `config`. Pure; performs no I/O.
pub fn resolve(descriptor: &ProviderDescriptor, config: &Config) -> Resolved {
    let own = config.provider(&descriptor.name);
    let enabled = own.map_or(true, |s| s.enabled);

    let credential = descriptor
        .credential_key
        .as_deref()
        .or(descriptor.is_local().then_some(descriptor.name.as_str()))
        .and_then(|key| config.provider(key))
        .and_then(|s| non_empty(s.api_key.as_ref()))
        .unwrap_or_default()
        .to_string();

    let model = config
        .provider(&descriptor.model_key)
        .and_then(|s| non_empty(s.model.as_ref()))
        .unwrap_or(descriptor.default_model.as_str())
        .to_string();

    let base_url = own
        .and_then(|s| non_empty(s.base_url.as_ref()))
        .unwrap_or(descriptor.base_url.as_str())
        .to_string();

    let available = enabled && (descriptor.is_local() || !credential.is_empty());

    Resolved {
        available,
        endpoint: Endpoint {
            provider: descriptor.name.clone(),
            base_url,
            model,
            credential,
        },
    }
}
