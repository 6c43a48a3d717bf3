//! Rotation executor.
//!
//! Each call runs a small state machine:
//!
//! 1. Select the next eligible provider, excluding everything tried so far
//! 2. Send the request under the attempt budget
//! 3. Classify the result: success ends the call, a rate limit cools the
//!    provider down, any other failure just skips it
//! 4. Repeat until a reply, no candidate left, the attempt cap or the deadline

use crate::classify::{classify, AttemptOutcome};
use crate::config::Config;
use crate::cooldown::{instant_after, CooldownStatus, CooldownTracker};
use crate::error::{AttemptError, RotationError};
use crate::registry::{resolve, ProviderRegistry};
use crate::selector::{select, Candidate, ExcludeSet};
use parking_lot::RwLock;
use rota_provider::{adapter_for, ChatMessage, ChatOptions, ProviderError, Tier, WireFamily};
use std::fmt;
use std::time::{Duration, SystemTime};
use tokio::time::Instant;
use tracing::Instrument;

/// How one attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    RateLimited,
    Failed,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OutcomeKind::Success => "success",
            OutcomeKind::RateLimited => "rate-limited",
            OutcomeKind::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Record of one attempt within a call.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub provider: String,
    pub outcome: OutcomeKind,
    /// Wall-clock time the attempt started.
    pub at: SystemTime,
    pub elapsed: Duration,
    /// Classified error for failed attempts.
    pub error: Option<AttemptError>,
}

/// A reply together with where it came from.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    /// Every attempt made, the successful one last.
    pub attempts: Vec<Attempt>,
}

/// Point-in-time view of one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderStatus {
    pub name: String,
    pub tier: Tier,
    pub priority: u32,
    pub family: WireFamily,
    pub model: String,
    pub available: bool,
    pub cooldown_remaining: Option<Duration>,
}

/// Priority-ordered failover across chat providers.
///
/// Owns the registry and the cooldown state; share it as
/// `Arc<RotationEngine>` between concurrent callers.
pub struct RotationEngine {
    registry: ProviderRegistry,
    cooldowns: CooldownTracker,
    config: RwLock<Config>,
    client: reqwest::Client,
}

impl RotationEngine {
    pub fn new(registry: ProviderRegistry, config: Config) -> Self {
        Self {
            registry,
            cooldowns: CooldownTracker::new(),
            config: RwLock::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// Use a preconfigured HTTP client (proxies, custom TLS).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Copy of the current configuration.
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Replace the configuration; later calls resolve against it.
    pub fn update_config(&self, config: Config) {
        *self.config.write() = config;
    }

    /// Active cooldowns, sorted by provider name.
    pub fn snapshot(&self) -> Vec<CooldownStatus> {
        self.cooldowns.snapshot()
    }

    /// Every registered provider, in priority order, with its current state.
    pub fn status(&self) -> Vec<ProviderStatus> {
        let config = self.config();
        self.registry
            .providers()
            .iter()
            .map(|descriptor| {
                let resolved = resolve(descriptor, &config);
                ProviderStatus {
                    name: descriptor.name.clone(),
                    tier: descriptor.tier,
                    priority: descriptor.priority,
                    family: descriptor.family,
                    model: resolved.endpoint.model,
                    available: resolved.available,
                    cooldown_remaining: self.cooldowns.remaining(&descriptor.name),
                }
            })
            .collect()
    }

    /// Forget every cooldown.
    pub fn reset_cooldowns(&self) {
        self.cooldowns.clear();
    }

    /// Send `messages` to the first provider that answers; return its text.
    pub async fn chat(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<String, RotationError> {
        self.chat_detailed(messages, options)
            .await
            .map(|response| response.text)
    }

    /// Like [`chat`](Self::chat), also reporting the provider used and
    /// every attempt made.
    pub async fn chat_detailed(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, RotationError> {
        let span = tracing::info_span!("chat", request = %ulid::Ulid::new());
        self.rotate(messages, options).instrument(span).await
    }

    async fn rotate(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatResponse, RotationError> {
        let config = self.config();
        let routing = config.routing.clone();

        let available: Vec<&str> = self
            .registry
            .providers()
            .iter()
            .filter(|d| resolve(d, &config).available)
            .map(|d| d.name.as_str())
            .collect();
        if available.is_empty() {
            return Err(RotationError::Configuration(
                "no local provider is enabled and no API key is configured".to_string(),
            ));
        }

        let deadline = options.deadline.map(instant_after);
        let max_attempts = routing.max_attempts.max(1);
        let mut exclude = ExcludeSet::new();
        let mut attempts: Vec<Attempt> = Vec::new();

        while attempts.len() < max_attempts {
            if deadline.is_some_and(|d| Instant::now() >= d) && !attempts.is_empty() {
                tracing::warn!(attempts = attempts.len(), "deadline reached");
                break;
            }

            let Some(candidate) = select(&self.registry, &self.cooldowns, &config, &exclude) else {
                break;
            };
            let name = candidate.descriptor.name.clone();
            let attempt_no = attempts.len() + 1;
            tracing::debug!(provider = %name, attempt = attempt_no, model = %candidate.endpoint.model, "selected provider");

            let budget = match deadline {
                Some(d) => routing
                    .attempt_timeout()
                    .min(d.saturating_duration_since(Instant::now())),
                None => routing.attempt_timeout(),
            };

            let at = SystemTime::now();
            let started = Instant::now();
            let outcome = self.attempt(&candidate, messages, options, budget).await;
            let elapsed = started.elapsed();
            exclude = exclude.with(&name);

            match outcome {
                AttemptOutcome::Success(text) => {
                    self.cooldowns.clear_failures(&name);
                    tracing::info!(provider = %name, attempt = attempt_no, elapsed_ms = elapsed.as_millis() as u64, "provider answered");
                    attempts.push(Attempt {
                        provider: name.clone(),
                        outcome: OutcomeKind::Success,
                        at,
                        elapsed,
                        error: None,
                    });
                    return Ok(ChatResponse {
                        text,
                        provider: name,
                        model: candidate.endpoint.model,
                        attempts,
                    });
                }
                AttemptOutcome::RateLimited(err) => {
                    self.cooldowns.mark_rate_limited(&name, routing.cooldown());
                    tracing::warn!(provider = %name, attempt = attempt_no, error = %err, cooldown_secs = routing.cooldown_secs, "rate limited, cooling down");
                    attempts.push(Attempt {
                        provider: name,
                        outcome: OutcomeKind::RateLimited,
                        at,
                        elapsed,
                        error: Some(err),
                    });
                }
                AttemptOutcome::Failed(err) => {
                    tracing::warn!(provider = %name, attempt = attempt_no, error = %err, "attempt failed, trying next provider");
                    if let Some(soft) = &routing.soft_backoff {
                        let failures = self.cooldowns.record_transient_failure(&name);
                        if failures >= soft.after_failures {
                            self.cooldowns.mark_at_least(&name, soft.cooldown());
                            self.cooldowns.clear_failures(&name);
                            tracing::warn!(provider = %name, failures, cooldown_secs = soft.cooldown_secs, "repeated failures, backing off");
                        }
                    }
                    attempts.push(Attempt {
                        provider: name,
                        outcome: OutcomeKind::Failed,
                        at,
                        elapsed,
                        error: Some(err),
                    });
                }
            }
        }

        Err(self.terminal_error(attempts, &available))
    }

    async fn attempt(
        &self,
        candidate: &Candidate<'_>,
        messages: &[ChatMessage],
        options: &ChatOptions,
        budget: Duration,
    ) -> AttemptOutcome {
        let adapter = adapter_for(candidate.descriptor.family);
        let send = adapter.send(&self.client, &candidate.endpoint, messages, options);
        let result = match tokio::time::timeout(budget, send).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(budget)),
        };
        classify(&candidate.descriptor.name, result)
    }

    fn terminal_error(&self, mut attempts: Vec<Attempt>, available: &[&str]) -> RotationError {
        let count = attempts.len();
        if let Some(last) = attempts.pop().and_then(|a| a.error) {
            tracing::warn!(attempts = count, error = %last, "all providers failed");
            return RotationError::Exhausted {
                attempts: count,
                last,
            };
        }

        // Nothing was sent: every available provider is cooling down.
        let next = available
            .iter()
            .filter_map(|name| self.cooldowns.remaining(name).map(|r| (*name, r)))
            .min_by_key(|(_, remaining)| *remaining);
        let message = match next {
            Some((name, remaining)) => format!(
                "all {} available provider(s) are cooling down; {} is next in {}s",
                available.len(),
                name,
                remaining.as_secs().max(1)
            ),
            None => "no eligible provider".to_string(),
        };
        RotationError::Configuration(message)
    }
}
