//! Interactive chat loop
//!
//! Reads lines with rustyline, routes slash commands, and hands every
//! other line to the conversation turn driver.

pub mod commands;
pub mod display;
pub mod input;

use crate::conversation::Conversation;
use crate::emotion::Language;
use crate::generation::{prompts, Personality};
use anyhow::Result;
use commands::Command;
use input::{InputHandler, ReadOutcome};
use std::path::PathBuf;
use tracing::info;

/// Chat REPL over one conversation
pub struct ChatRepl {
    conversation: Conversation,
    input: InputHandler,
    model: String,
}

impl ChatRepl {
    pub fn new(conversation: Conversation, model: impl Into<String>, history: Option<PathBuf>) -> Result<Self> {
        let mut input = match history {
            Some(path) => InputHandler::with_history(path)?,
            None => InputHandler::new()?,
        };
        input.set_prompt(display::user_prompt(conversation.language()));

        Ok(Self {
            conversation,
            input,
            model: model.into(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let language = self.conversation.language();
        display::show_banner(
            env!("CARGO_PKG_VERSION"),
            &self.model,
            language,
            self.conversation.personality(),
            self.conversation.learning_enabled(),
        );
        display::show_info(prompts::welcome(language));
        info!(session = %self.conversation.session_id(), %language, "chat started");

        loop {
            let line = match self.input.read_line()? {
                ReadOutcome::Line(line) => line,
                ReadOutcome::Interrupted => {
                    display::show_warning("Interrupted (type /exit to quit)");
                    continue;
                }
                ReadOutcome::Eof => break,
            };

            if line.is_empty() {
                continue;
            }

            if let Some(command) = commands::parse(&line) {
                if !self.execute(command)? {
                    break;
                }
                continue;
            }

            let outcome = self.conversation.respond(&line).await;
            display::show_turn(
                self.conversation.language(),
                &outcome.emotions,
                &outcome.response,
                outcome.used_suggestion,
            );
        }

        display::show_info("Goodbye!");
        self.input.save_history()?;
        info!(session = %self.conversation.session_id(), "chat ended");
        Ok(())
    }

    /// Returns false when the chat should end
    fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Help => display::show_help(),
            Command::Stats => {
                if !self.conversation.learning_enabled() {
                    display::show_warning("Learning is currently disabled.");
                }
                match self.conversation.coordinator().statistics() {
                    Ok(stats) => println!("{}", display::render_stats(&stats)),
                    Err(e) => display::show_error(&e.to_string()),
                }
            }
            Command::Patterns { limit } => {
                let language = self.conversation.language();
                match self.conversation.coordinator().memory().top_patterns(language, limit) {
                    Ok(patterns) => println!("{}", display::render_patterns(&patterns, language)),
                    Err(e) => display::show_error(&e.to_string()),
                }
            }
            Command::Reset => {
                let answer = self
                    .input
                    .ask("This will delete all learning data. Are you sure? (y/n): ")?;
                if matches!(answer, ReadOutcome::Line(ref a) if a.eq_ignore_ascii_case("y")) {
                    if self.conversation.coordinator_mut().reset() {
                        display::show_success("Learning data has been reset.");
                    } else {
                        display::show_error("Failed to reset learning data; see the log for details.");
                    }
                }
            }
            Command::Language { name: None } => {
                let names: Vec<&str> = self
                    .conversation
                    .supported_languages()
                    .iter()
                    .map(|l| l.as_str())
                    .collect();
                display::show_info(&format!(
                    "Current language: {} (available: {})",
                    self.conversation.language(),
                    names.join(", ")
                ));
            }
            Command::Language { name: Some(name) } => match Language::parse(&name) {
                Some(language) if self.conversation.set_language(language) => {
                    self.input.set_prompt(display::user_prompt(language));
                    display::show_success(&format!("Language changed to {}", language));
                }
                _ => display::show_error(&format!("Language {} not supported", name)),
            },
            Command::Personality { id: None } => {
                println!("{}", display::render_personalities(self.conversation.personality()));
            }
            Command::Personality { id: Some(id) } => match Personality::parse(&id) {
                Some(personality) => {
                    self.conversation.set_personality(personality);
                    info!(%personality, "personality changed");
                    display::show_success(&format!("Personality changed to: {}", personality.name()));
                }
                None => display::show_error(&format!("Personality {} not available", id)),
            },
            Command::Learning => {
                let enabled = self.conversation.toggle_learning();
                let state = if enabled { "enabled" } else { "disabled" };
                display::show_success(&format!("Learning {}", state));
            }
            Command::Exit => return Ok(false),
            Command::Unknown { input } => {
                display::show_warning(&format!("Unknown command: {} (try /help)", input.trim()));
            }
        }

        Ok(true)
    }
}
