//! Integration tests for rota.
//!
//! These tests wire the config store, the built-in catalog and the engine
//! together the way the binary does, without a live API key.

use rota_core::*;
use rota_provider::{ChatMessage, ChatOptions, Tier};
use serde_json::json;
use std::fs;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn load(dir: &tempfile::TempDir, content: serde_json::Value) -> Config {
    let file = dir.path().join("config.json");
    fs::write(&file, content.to_string()).unwrap();
    ConfigStore::with_path(file).try_load().unwrap()
}

#[test]
fn test_builtin_catalog_order() {
    let registry = ProviderRegistry::builtin();
    let names: Vec<_> = registry.names().collect();
    assert_eq!(&names[..3], &["lm_studio", "ollama", "groq"]);

    // local before free before paid
    let rank = |tier: Tier| match tier {
        Tier::Local => 0,
        Tier::Free => 1,
        Tier::Paid => 2,
    };
    let ranks: Vec<_> = registry.providers().iter().map(|p| rank(p.tier)).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_fresh_install_only_local_available() {
    let engine = RotationEngine::new(ProviderRegistry::builtin(), Config::default());
    let available: Vec<_> = engine
        .status()
        .into_iter()
        .filter(|s| s.available)
        .map(|s| s.name)
        .collect();
    assert_eq!(available, vec!["lm_studio", "ollama"]);
}

#[test]
fn test_env_credentials_enable_cloud_providers() {
    let registry = ProviderRegistry::builtin();
    let mut config = Config::default();
    config.fill_credentials_with(registry.names(), |var| {
        (var == "GROQ_API_KEY").then(|| "gk".to_string())
    });

    let engine = RotationEngine::new(registry, config);
    let groq = engine.status().into_iter().find(|s| s.name == "groq").unwrap();
    assert!(groq.available);
    assert_eq!(groq.model, "llama3-70b-8192");
}

#[tokio::test]
async fn test_custom_provider_from_config_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer lab-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "from the lab"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = load(
        &dir,
        json!({
            "providers": {
                "lm_studio": {"enabled": false},
                "ollama": {"enabled": false},
                "lab": {"api_key": "lab-key"}
            },
            "custom_providers": [{
                "name": "lab",
                "priority": 5,
                "base_url": format!("{}/v1", server.uri()),
                "default_model": "lab-model"
            }]
        }),
    );

    let registry = ProviderRegistry::from_config(&config).unwrap();
    assert_eq!(registry.names().next(), Some("lab"));

    let engine = RotationEngine::new(registry, config);
    let response = engine
        .chat_detailed(&[ChatMessage::user("hi")], &ChatOptions::default())
        .await
        .unwrap();
    assert_eq!(response.text, "from the lab");
    assert_eq!(response.provider, "lab");
    assert_eq!(response.model, "lab-model");
}

#[tokio::test]
async fn test_disabled_everything_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = load(
        &dir,
        json!({"providers": {"lm_studio": {"enabled": false}, "ollama": {"enabled": false}}}),
    );
    let engine = RotationEngine::new(ProviderRegistry::from_config(&config).unwrap(), config);

    let err = engine
        .chat(&[ChatMessage::user("hi")], &ChatOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, RotationError::Configuration(_)));
}
