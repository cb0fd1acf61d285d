//! Command-line argument parsing for EmoBuddy
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::Config;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// EmoBuddy - an emotion-aware chat companion that learns which replies help
#[derive(Parser, Debug)]
#[command(name = "emobuddy")]
#[command(version)]
#[command(about = "Emotion-aware multilingual chat that learns from past conversations", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pattern database path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Conversation language (english, urdu, hindi, punjabi or en, ur, hi, pa)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Persona (default, therapist, friend, coach, teacher, poet)
    #[arg(short, long)]
    pub personality: Option<String>,

    /// Ollama model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Ollama host
    #[arg(long)]
    pub host: Option<String>,

    /// Ollama port
    #[arg(long)]
    pub port: Option<u16>,

    /// Console log verbosity: -v (info), -vv (debug), -vvv (trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Start interactive chat (default)
    Chat,

    /// Show learning statistics
    Stats,

    /// Show the most frequent learned patterns
    Patterns {
        /// Number of patterns to show
        #[arg(long, default_value_t = 3)]
        limit: usize,
    },

    /// Delete all learned interactions and patterns
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Display current configuration
    Config,
}

impl Args {
    /// Subcommand to run; chat when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }

    /// Write command-line overrides into a loaded configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.ollama.host = host.clone();
        }
        if let Some(port) = self.port {
            config.ollama.port = port;
        }
        if let Some(model) = &self.model {
            config.ollama.model = model.clone();
        }
        if let Some(language) = &self.language {
            config.language.default = language.clone();
        }
        if let Some(personality) = &self.personality {
            config.personality.default = personality.clone();
        }
        if let Some(db) = &self.db {
            config.paths.database = db.to_string_lossy().into_owned();
        }
    }
}
