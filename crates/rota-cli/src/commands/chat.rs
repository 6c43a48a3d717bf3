//! Interactive chat loop.

use super::{describe_error, format_remaining, providers};
use rota_core::RotationEngine;
use rota_provider::{ChatMessage, ChatOptions};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Message(String),
    Status,
    Reset,
    Clear,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    if !line.starts_with('/') {
        return Input::Message(line.to_string());
    }
    match line {
        "/status" => Input::Status,
        "/reset" => Input::Reset,
        "/clear" => Input::Clear,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        other => Input::Unknown(other.to_string()),
    }
}

const HELP: &str = "\
/status  show providers and cooldowns
/reset   clear all cooldowns
/clear   forget the conversation so far
/quit    leave";

/// Run interactive chat mode.
pub async fn run(
    engine: &RotationEngine,
    system: Option<&str>,
    options: &ChatOptions,
) -> anyhow::Result<()> {
    let mut history: Vec<ChatMessage> = system.map(ChatMessage::system).into_iter().collect();
    let base_len = history.len();

    println!("rota chat. Type /help for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => println!("{HELP}"),
            Input::Unknown(command) => println!("Unknown command: {command}. Type /help."),
            Input::Status => {
                providers::print_table(&engine.status());
            }
            Input::Reset => {
                engine.reset_cooldowns();
                println!("Cooldowns cleared.");
            }
            Input::Clear => {
                history.truncate(base_len);
                println!("Conversation cleared.");
            }
            Input::Message(text) => {
                history.push(ChatMessage::user(text));
                match engine.chat_detailed(&history, options).await {
                    Ok(response) => {
                        println!("{}", response.text);
                        println!("  [{} · {}]", response.provider, response.model);
                        history.push(ChatMessage::assistant(response.text));
                    }
                    Err(err) => {
                        history.pop();
                        eprintln!("{}", describe_error(&err));
                        if let Some(next) = engine.snapshot().into_iter().min_by_key(|s| s.remaining) {
                            eprintln!(
                                "  {} is available again in {}",
                                next.name,
                                format_remaining(next.remaining)
                            );
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
