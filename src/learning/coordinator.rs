//! Learning coordinator: reward bookkeeping, exploration and prompt
//! augmentation for one conversation

use super::policy::{target_emotion, RandomSource, StdRandom};
use super::prompt::build_augmentation;
use crate::emotion::{sequence_key, Emotion, Language};
use crate::errors::{AgentError, Result};
use crate::memory::{MemoryService, MemoryStats};
use crate::reward::{NewInteraction, RewardModel};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Characters of user input echoed in training events
const LOG_PREVIEW_CHARS: usize = 30;

/// Tunables for the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningSettings {
    /// Probability of skipping cached responses and generating fresh
    pub epsilon: f64,
    /// Carried and reported; no update rule consumes it
    pub learning_rate: f64,
    /// Carried and reported; no update rule consumes it
    pub gamma: f64,
    /// Similar interactions fetched for prompt augmentation
    pub similar_limit: usize,
    /// Suggested responses fetched per transition
    pub suggestion_limit: usize,
}

impl Default for LearningSettings {
    fn default() -> Self {
        Self {
            epsilon: 0.1,
            learning_rate: 0.001,
            gamma: 0.95,
            similar_limit: 3,
            suggestion_limit: 3,
        }
    }
}

/// Memory statistics plus the coordinator's own settings and session totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LearningStats {
    pub memory: MemoryStats,
    pub epsilon: f64,
    pub learning_rate: f64,
    pub gamma: f64,
    pub session_interactions: u64,
    pub session_average_reward: f64,
}

pub struct LearningCoordinator {
    memory: Arc<MemoryService>,
    reward_model: RewardModel,
    settings: LearningSettings,
    rng: Box<dyn RandomSource>,
    total_reward: f64,
    interaction_count: u64,
}

impl LearningCoordinator {
    /// Coordinator with the standard reward table and an entropy-seeded RNG
    pub fn new(memory: Arc<MemoryService>, settings: LearningSettings) -> Self {
        Self::with_parts(
            memory,
            RewardModel::default(),
            settings,
            Box::new(StdRandom::from_entropy()),
        )
    }

    pub fn with_parts(
        memory: Arc<MemoryService>,
        reward_model: RewardModel,
        settings: LearningSettings,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            memory,
            reward_model,
            settings,
            rng,
            total_reward: 0.0,
            interaction_count: 0,
        }
    }

    pub fn memory(&self) -> &Arc<MemoryService> {
        &self.memory
    }

    pub fn settings(&self) -> &LearningSettings {
        &self.settings
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    pub fn interaction_count(&self) -> u64 {
        self.interaction_count
    }

    /// Reward an observed transition without persisting it
    pub fn update(&mut self, user_input: &str, current: Emotion, next: Emotion, language: Language) -> f64 {
        let reward = self.reward_model.reward(Some(current), next);
        self.record_reward(reward);

        info!(
            target: "emobuddy::training",
            transition = %sequence_key(current, next),
            %language,
            reward,
            input = %preview(user_input),
            "transition rewarded"
        );

        reward
    }

    /// Reward a transition and persist it with the response that caused it.
    ///
    /// Session totals only move once the write has succeeded.
    pub fn update_with_response(
        &mut self,
        user_input: &str,
        emotion: Emotion,
        response: &str,
        next: Emotion,
        language: Language,
    ) -> Result<f64> {
        let record = self
            .reward_model
            .score(NewInteraction::new(user_input, emotion, response, next, language));
        let reward = record.reward();

        self.memory.store(&record)?;
        self.record_stored(user_input, emotion, next, language, reward);
        Ok(reward)
    }

    /// Same as `update_with_response`, but the SQLite write (busy waits and
    /// retry backoff included) runs on tokio's blocking pool.
    pub async fn update_with_response_async(
        &mut self,
        user_input: &str,
        emotion: Emotion,
        response: &str,
        next: Emotion,
        language: Language,
    ) -> Result<f64> {
        let record = self
            .reward_model
            .score(NewInteraction::new(user_input, emotion, response, next, language));
        let reward = record.reward();

        let memory = Arc::clone(&self.memory);
        tokio::task::spawn_blocking(move || memory.store(&record))
            .await
            .map_err(|e| AgentError::Generic(format!("storage task failed: {}", e)))??;

        self.record_stored(user_input, emotion, next, language, reward);
        Ok(reward)
    }

    fn record_stored(&mut self, user_input: &str, emotion: Emotion, next: Emotion, language: Language, reward: f64) {
        self.record_reward(reward);

        info!(
            target: "emobuddy::training",
            transition = %sequence_key(emotion, next),
            %language,
            reward,
            input = %preview(user_input),
            "interaction stored"
        );
    }

    pub fn determine_target_emotion(&mut self, current: Emotion) -> Emotion {
        target_emotion(current, self.rng.as_mut())
    }

    /// Cached response for the current emotion, or `None` to generate fresh.
    ///
    /// With probability `epsilon` this explores and returns `None` without
    /// touching memory. Storage read failures also yield `None`.
    pub fn get_suggested_response(
        &mut self,
        _user_input: &str,
        emotion: Emotion,
        language: Language,
    ) -> Option<String> {
        if self.rng.next_unit() < self.settings.epsilon {
            debug!(%emotion, "exploring, no suggestion");
            return None;
        }

        let target = self.determine_target_emotion(emotion);
        let suggestions = match self.memory.suggested_responses(
            emotion,
            target,
            language,
            self.settings.suggestion_limit,
        ) {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "suggestion lookup failed");
                return None;
            }
        };

        if suggestions.is_empty() {
            return None;
        }

        let pick = self.rng.next_index(suggestions.len());
        debug!(%emotion, %target, choices = suggestions.len(), "using cached suggestion");
        suggestions.into_iter().nth(pick)
    }

    /// Augmentation text for the generator; empty when memory has nothing
    /// to add
    pub fn enhance_prompt(&mut self, user_input: &str, emotion: Emotion, language: Language) -> String {
        let similar = self
            .memory
            .similar_interactions(user_input, emotion, language, self.settings.similar_limit)
            .unwrap_or_else(|e| {
                warn!(error = %e, "similar interaction lookup failed");
                Vec::new()
            });

        let target = self.determine_target_emotion(emotion);
        let suggestions = self
            .memory
            .suggested_responses(emotion, target, language, self.settings.suggestion_limit)
            .unwrap_or_else(|e| {
                warn!(error = %e, "suggestion lookup failed");
                Vec::new()
            });

        build_augmentation(&similar, &suggestions, target)
    }

    pub fn statistics(&self) -> Result<LearningStats> {
        let memory = self.memory.statistics()?;
        Ok(LearningStats {
            memory,
            epsilon: self.settings.epsilon,
            learning_rate: self.settings.learning_rate,
            gamma: self.settings.gamma,
            session_interactions: self.interaction_count,
            session_average_reward: self.total_reward / self.interaction_count.max(1) as f64,
        })
    }

    /// Clear stored memory and session totals. Totals are zeroed even when
    /// the storage reset fails.
    pub fn reset(&mut self) -> bool {
        let cleared = match self.memory.reset() {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "failed to reset learning memory");
                false
            }
        };
        self.total_reward = 0.0;
        self.interaction_count = 0;
        cleared
    }

    fn record_reward(&mut self, reward: f64) {
        self.total_reward += reward;
        self.interaction_count += 1;
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > LOG_PREVIEW_CHARS {
        let head: String = text.chars().take(LOG_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
