//! Reward model: fixed desirability table for emotion transitions
//!
//! Moving toward `happy` pays most. Leaving a positive state costs more
//! than staying in a negative one.

use crate::emotion::{Emotion, Language};
use chrono::{DateTime, Utc};

/// Standard reward table, rows = previous emotion, columns = current
/// emotion, both in `Emotion::ALL` order.
const STANDARD_TABLE: [[f64; 4]; 4] = [
    // neutral -> neutral, happy, sad, angry
    [0.1, 0.5, -0.2, -0.5],
    // happy ->
    [-0.1, 0.3, -0.7, -0.8],
    // sad ->
    [0.3, 0.8, -0.2, -0.5],
    // angry ->
    [0.5, 0.9, -0.1, -0.5],
];

/// Pure lookup from (previous, current) to a scalar reward
#[derive(Debug, Clone, PartialEq)]
pub struct RewardModel {
    table: [[f64; 4]; 4],
}

impl RewardModel {
    /// Model with the standard table
    pub fn new() -> Self {
        Self {
            table: STANDARD_TABLE,
        }
    }

    /// Reward for a transition. A missing previous state counts as `Neutral`.
    pub fn reward(&self, previous: Option<Emotion>, current: Emotion) -> f64 {
        let previous = previous.unwrap_or_default();
        self.table[previous.index()][current.index()]
    }

    /// Reward for a transition given as raw labels
    pub fn reward_for_labels(&self, previous: Option<&str>, current: &str) -> f64 {
        self.reward(previous.map(Emotion::from_label), Emotion::from_label(current))
    }

    /// Attach the reward to a draft interaction
    pub fn score(&self, draft: NewInteraction) -> ScoredInteraction {
        let reward = self.reward(Some(draft.emotion), draft.next_emotion);
        ScoredInteraction { draft, reward }
    }
}

impl Default for RewardModel {
    fn default() -> Self {
        Self::new()
    }
}

/// An interaction before its reward is known
#[derive(Debug, Clone, PartialEq)]
pub struct NewInteraction {
    pub user_input: String,
    pub emotion: Emotion,
    pub response: String,
    pub next_emotion: Emotion,
    pub language: Language,
    pub timestamp: DateTime<Utc>,
}

impl NewInteraction {
    pub fn new(
        user_input: impl Into<String>,
        emotion: Emotion,
        response: impl Into<String>,
        next_emotion: Emotion,
        language: Language,
    ) -> Self {
        Self {
            user_input: user_input.into(),
            emotion,
            response: response.into(),
            next_emotion,
            language,
            timestamp: Utc::now(),
        }
    }
}

/// An interaction whose reward came from a `RewardModel`.
///
/// Only `RewardModel::score` builds one, so a stored reward is always
/// reproducible from the stored emotions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInteraction {
    draft: NewInteraction,
    reward: f64,
}

impl ScoredInteraction {
    pub fn interaction(&self) -> &NewInteraction {
        &self.draft
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }
}
