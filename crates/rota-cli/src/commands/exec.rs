//! Single-shot exec command.

use super::describe_error;
use rota_core::{Attempt, RotationEngine, RotationError};
use rota_provider::{ChatMessage, ChatOptions};
use serde::Serialize;
use std::time::Instant;

/// `rota exec` options.
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub system: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub json: bool,
}

/// Typed error used to propagate deterministic process exit codes.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ExecExitError {
    pub code: i32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
struct AttemptRecord {
    provider: String,
    outcome: String,
    elapsed_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&Attempt> for AttemptRecord {
    fn from(attempt: &Attempt) -> Self {
        Self {
            provider: attempt.provider.clone(),
            outcome: attempt.outcome.to_string(),
            elapsed_ms: attempt.elapsed.as_millis(),
            error: attempt.error.as_ref().map(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct ExecOutput {
    status: &'static str,
    text: String,
    provider: Option<String>,
    model: Option<String>,
    attempts: Vec<AttemptRecord>,
    elapsed_ms: u128,
    error: Option<String>,
}

/// Send one prompt and print the reply.
pub async fn run(
    engine: &RotationEngine,
    prompt: &str,
    options: ExecOptions,
    chat_options: ChatOptions,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let messages = build_messages(options.system.as_deref(), prompt);

    let mut chat_options = chat_options;
    chat_options.temperature = options.temperature;
    chat_options.max_tokens = options.max_tokens;

    match engine.chat_detailed(&messages, &chat_options).await {
        Ok(response) => {
            let output = ExecOutput {
                status: "ok",
                text: response.text,
                provider: Some(response.provider),
                model: Some(response.model),
                attempts: response.attempts.iter().map(AttemptRecord::from).collect(),
                elapsed_ms: started.elapsed().as_millis(),
                error: None,
            };
            emit(&options, &output)
        }
        Err(err) => {
            let message = describe_error(&err);
            let output = ExecOutput {
                status: "error",
                text: String::new(),
                provider: None,
                model: None,
                attempts: Vec::new(),
                elapsed_ms: started.elapsed().as_millis(),
                error: Some(message.clone()),
            };
            if options.json {
                emit(&options, &output)?;
            }
            Err(anyhow::Error::new(ExecExitError {
                code: exit_code(&err),
                message,
            }))
        }
    }
}

fn build_messages(system: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    system
        .filter(|s| !s.trim().is_empty())
        .map(ChatMessage::system)
        .into_iter()
        .chain(std::iter::once(ChatMessage::user(prompt)))
        .collect()
}

fn exit_code(err: &RotationError) -> i32 {
    match err {
        RotationError::Exhausted { .. } => 1,
        RotationError::Configuration(_) => 2,
    }
}

fn emit(options: &ExecOptions, output: &ExecOutput) -> anyhow::Result<()> {
    if options.json {
        println!("{}", serde_json::to_string(output)?);
    } else if !output.text.is_empty() {
        println!("{}", output.text);
    }
    Ok(())
}
