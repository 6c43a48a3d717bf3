//! CLI argument and command definitions.

use clap::{Parser, Subcommand};
use rota_core::Config;
use rota_provider::ChatOptions;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "rota", version, about = "Chat with LLM providers, failing over on rate limits")]
pub struct Cli {
    /// Provider to try first when it is eligible ("auto" for plain priority order).
    #[arg(long, env = "ROTA_MODE", global = true)]
    pub mode: Option<String>,

    /// Per-attempt timeout in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Overall time limit per request in seconds, across all attempts.
    #[arg(long, global = true)]
    pub deadline: Option<u64>,

    /// Maximum number of providers tried per request.
    #[arg(long, global = true)]
    pub max_attempts: Option<usize>,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session (default).
    Chat {
        /// System prompt for the session.
        #[arg(long)]
        system: Option<String>,
    },

    /// Send a single prompt and print the reply.
    Exec {
        /// The prompt to send.
        prompt: String,

        /// System prompt.
        #[arg(long)]
        system: Option<String>,

        /// Sampling temperature.
        #[arg(long)]
        temperature: Option<f32>,

        /// Maximum tokens in the reply.
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Print a JSON result object instead of plain text.
        #[arg(long)]
        json: bool,
    },

    /// List providers in priority order with their current state.
    Providers {
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(mode) = &self.mode {
            config.mode = Some(mode.clone());
        }
        if let Some(timeout) = self.timeout {
            config.routing.attempt_timeout_secs = timeout;
        }
        if let Some(max_attempts) = self.max_attempts {
            config.routing.max_attempts = max_attempts;
        }
    }

    /// Request options shared by every command.
    pub fn chat_options(&self) -> ChatOptions {
        match self.deadline {
            Some(secs) => ChatOptions::default().with_deadline(Duration::from_secs(secs)),
            None => ChatOptions::default(),
        }
    }
}
