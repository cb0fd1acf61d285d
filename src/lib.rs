//! EmoBuddy - Emotion-Aware Chat with Reinforcement Memory
//!
//! A terminal chat companion that detects the user's emotion each turn,
//! remembers which replies moved people toward better emotional states,
//! and reuses or learns from them in later conversations.
//!
//! # Architecture
//!
//! - **Core**: emotion vocabulary, reward model, SQLite pattern store,
//!   memory retrieval and the learning coordinator
//! - **Collaborators**: Ollama-backed emotion classifier and response
//!   generator behind async traits
//! - **Interface**: conversation turn driver, chat log, REPL and CLI

pub mod errors;

pub mod emotion;
pub mod reward;
pub mod store;
pub mod memory;
pub mod learning;

pub mod streaming;
pub mod detection;
pub mod generation;
pub mod conversation;

pub mod config;
pub mod logging;
pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use emotion::{Emotion, EmotionScore, Language};
pub use errors::{AgentError, Result};
pub use generation::Personality;
pub use learning::{LearningCoordinator, LearningSettings, LearningStats};
pub use memory::MemoryService;
pub use reward::RewardModel;
pub use store::PatternStore;
