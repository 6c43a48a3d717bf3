use crate::error::ConfigError;
use rota_provider::{Tier, WireFamily};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_MAX_ATTEMPTS: usize = 3;
const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_COOLDOWN_SECS: u64 = 60;

/// Serialized settings from ~/.rota/config.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Preferred provider. Absent, empty or `auto` means plain priority order.
    pub mode: Option<String>,
    /// Per-provider settings keyed by provider name.
    pub providers: HashMap<String, ProviderSettings>,
    /// Extra OpenAI-compatible (or other family) endpoints.
    pub custom_providers: Vec<CustomProvider>,
    /// Retry and cooldown tuning.
    pub routing: RoutingSettings,
}

/// Settings section for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub enabled: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: None,
            base_url: None,
            enabled: true,
        }
    }
}

/// A provider declared in configuration rather than built in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomProvider {
    pub name: String,
    pub priority: u32,
    #[serde(default = "default_custom_tier")]
    pub tier: Tier,
    #[serde(default = "default_custom_family")]
    pub family: WireFamily,
    pub base_url: String,
    pub default_model: String,
}

fn default_custom_tier() -> Tier {
    Tier::Paid
}

fn default_custom_family() -> WireFamily {
    WireFamily::OpenAiCompatible
}

/// Retry and cooldown tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Upper bound on attempts per call, regardless of registry size.
    pub max_attempts: usize,
    /// Per-attempt timeout.
    pub attempt_timeout_secs: u64,
    /// Cooldown applied after a rate-limit signal.
    pub cooldown_secs: u64,
    /// Optional short cooldown after repeated transient failures.
    pub soft_backoff: Option<SoftBackoff>,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            attempt_timeout_secs: DEFAULT_ATTEMPT_TIMEOUT_SECS,
            cooldown_secs: DEFAULT_COOLDOWN_SECS,
            soft_backoff: None,
        }
    }
}

impl RoutingSettings {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

/// Cool a provider down for `cooldown_secs` once it has failed
/// `after_failures` times in a row without a success in between.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftBackoff {
    pub after_failures: u32,
    pub cooldown_secs: u64,
}

impl Default for SoftBackoff {
    fn default() -> Self {
        Self {
            after_failures: 3,
            cooldown_secs: 15,
        }
    }
}

impl SoftBackoff {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Config {
    /// Settings for `name`, if any were given.
    pub fn provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.providers.get(name)
    }

    /// Provider named by `mode`, unless it is unset or `auto`.
    pub fn preferred_provider(&self) -> Option<&str> {
        self.mode
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case("auto"))
    }

    fn section(&mut self, name: &str) -> &mut ProviderSettings {
        self.providers.entry(name.to_string()).or_default()
    }

    /// Set the credential for `name`.
    pub fn with_api_key(mut self, name: &str, key: impl Into<String>) -> Self {
        self.section(name).api_key = Some(key.into());
        self
    }

    /// Override the model for `name`.
    pub fn with_model(mut self, name: &str, model: impl Into<String>) -> Self {
        self.section(name).model = Some(model.into());
        self
    }

    /// Override the base URL for `name`.
    pub fn with_base_url(mut self, name: &str, url: impl Into<String>) -> Self {
        self.section(name).base_url = Some(url.into());
        self
    }

    /// Exclude `name` from rotation.
    pub fn with_disabled(mut self, name: &str) -> Self {
        self.section(name).enabled = false;
        self
    }

    /// Set the preferred provider.
    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    /// Fill missing credentials using `lookup(ENV_VAR_NAME)`.
    ///
    /// The variable for provider `groq` is `GROQ_API_KEY`. Values already in
    /// the file win.
    pub fn fill_credentials_with<'a, F>(&mut self, names: impl IntoIterator<Item = &'a str>, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for name in names {
            let has_key = self
                .provider(name)
                .and_then(|p| p.api_key.as_deref())
                .is_some_and(|k| !k.trim().is_empty());
            if has_key {
                continue;
            }
            let env_var = format!("{}_API_KEY", name.to_uppercase());
            if let Some(value) = lookup(&env_var).filter(|v| !v.trim().is_empty()) {
                self.section(name).api_key = Some(value);
            }
        }
    }

    /// Fill missing credentials from `{NAME}_API_KEY` environment variables.
    pub fn fill_credentials_from_env<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        self.fill_credentials_with(names, |var| std::env::var(var).ok());
    }
}

/// Helper struct for storing the location to read/write global settings
pub struct ConfigStore {
    path: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore {
    pub fn new() -> Self {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".rota");
        path.push("config.json");
        Self { path }
    }

    /// Use a custom settings file (for testing).
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the saved config, failing on unreadable or malformed files.
    pub fn try_load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the user's saved config, or fallback to Default
    pub fn load(&self) -> Config {
        match self.try_load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    /// Save the config back to disk
    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
