//! Deterministic provider selection.

use crate::config::Config;
use crate::cooldown::CooldownTracker;
use crate::registry::{resolve, ProviderRegistry};
use rota_provider::{Endpoint, ProviderDescriptor};
use std::collections::BTreeSet;

/// Providers already attempted within one call.
///
/// Adding a name produces a new set, so each loop iteration sees a fixed
/// snapshot of what has been tried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExcludeSet(BTreeSet<String>);

impl ExcludeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// This set plus `name`.
    #[must_use]
    pub fn with(&self, name: &str) -> Self {
        let mut next = self.0.clone();
        next.insert(name.to_string());
        Self(next)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A provider chosen for the next attempt, with its resolved endpoint.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub descriptor: &'a ProviderDescriptor,
    pub endpoint: Endpoint,
}

/// Pick the next provider to try.
///
/// Returns the first provider in ascending priority that is not excluded,
/// not cooling down and available under `config`. A provider named by
/// `config.mode` is tried first when it passes the same checks; otherwise
/// the preference is ignored.
pub fn select<'a>(
    registry: &'a ProviderRegistry,
    tracker: &CooldownTracker,
    config: &Config,
    exclude: &ExcludeSet,
) -> Option<Candidate<'a>> {
    let eligible = |descriptor: &'a ProviderDescriptor| -> Option<Candidate<'a>> {
        if exclude.contains(&descriptor.name) || tracker.is_in_cooldown(&descriptor.name) {
            return None;
        }
        let resolved = resolve(descriptor, config);
        resolved.available.then_some(Candidate {
            descriptor,
            endpoint: resolved.endpoint,
        })
    };

    if let Some(preferred) = config.preferred_provider().and_then(|name| registry.get(name)) {
        if let Some(candidate) = eligible(preferred) {
            return Some(candidate);
        }
    }

    registry.providers().iter().find_map(eligible)
}
