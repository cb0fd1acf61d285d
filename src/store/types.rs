//! Record types persisted by the pattern store

use crate::emotion::{Emotion, Language};
use crate::store::responses::ResponseSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One processed conversational turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Row id, increasing with insertion order
    pub id: i64,
    pub user_input: String,
    /// State before the reply
    pub emotion: Emotion,
    /// What was shown to the user
    pub response: String,
    /// State observed afterwards (may equal `emotion` as a placeholder)
    pub next_emotion: Emotion,
    pub reward: f64,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

impl Interaction {
    /// Serialized transition key of this interaction
    pub fn sequence(&self) -> String {
        crate::emotion::sequence_key(self.emotion, self.next_emotion)
    }
}

/// Rolling aggregate of every interaction sharing a transition and language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionPattern {
    pub id: i64,
    /// `"<from>-><to>"`
    pub sequence: String,
    pub from: Emotion,
    pub to: Emotion,
    pub language: Language,
    pub successful_responses: ResponseSet,
    pub avg_reward: f64,
    pub count: u64,
}

/// Pattern frequency entry for statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionCount {
    pub sequence: String,
    pub language: Language,
    pub count: u64,
}

/// Aggregate view over everything the store has learned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_interactions: u64,
    /// Mean reward over all interactions, 0 when empty
    pub average_reward: f64,
    pub patterns_learned: u64,
    /// Five most frequent patterns, ties by insertion order
    pub top_transitions: Vec<TransitionCount>,
    /// Percentage (0-100) of interactions with positive reward, 0 when empty
    pub success_rate: f64,
}
