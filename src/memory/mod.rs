//! Memory service: retrieval layered on the pattern store
//!
//! Components:
//! - Similar interactions: same starting emotion and language, best reward first
//! - Suggested responses: a pattern's successful responses, or a scan of raw
//!   positively rewarded interactions for the same transition
//! - Statistics, top patterns and reset pass straight through

use crate::emotion::{Emotion, Language};
use crate::errors::Result;
use crate::reward::ScoredInteraction;
use crate::store::PatternStore;
use tracing::debug;

pub use crate::store::{EmotionPattern, Interaction, MemoryStats, TransitionCount};

/// Default number of similar interactions retrieved
pub const DEFAULT_SIMILAR_LIMIT: usize = 5;

/// Default number of suggested responses retrieved
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Query layer over the pattern store
pub struct MemoryService {
    store: PatternStore,
}

impl MemoryService {
    pub fn new(store: PatternStore) -> Self {
        Self { store }
    }

    /// Service over a fresh in-memory store
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(PatternStore::open_in_memory()?))
    }

    pub fn store_ref(&self) -> &PatternStore {
        &self.store
    }

    /// Persist an interaction and fold it into its pattern
    pub fn store(&self, record: &ScoredInteraction) -> Result<Interaction> {
        self.store.insert_interaction(record)
    }

    /// Past interactions that started from the same emotion in the same
    /// language, ordered by reward then recency.
    ///
    /// `_user_input` is not compared yet: this is a coarse emotion+language
    /// match, not semantic text similarity.
    pub fn similar_interactions(
        &self,
        _user_input: &str,
        emotion: Emotion,
        language: Language,
        limit: usize,
    ) -> Result<Vec<Interaction>> {
        let found = self.store.interactions_for(emotion, language, limit)?;
        debug!(%emotion, %language, found = found.len(), "similar interactions");
        Ok(found)
    }

    /// Responses that previously moved a user from `emotion` to
    /// `target_emotion`. Empty when nothing is known.
    ///
    /// Without a pattern list this falls back to positively rewarded
    /// interactions, deduplicated by response text.
    pub fn suggested_responses(
        &self,
        emotion: Emotion,
        target_emotion: Emotion,
        language: Language,
        limit: usize,
    ) -> Result<Vec<String>> {
        if let Some(pattern) = self.store.pattern(emotion, target_emotion, language)? {
            if !pattern.successful_responses.is_empty() {
                debug!(sequence = %pattern.sequence, %language, "suggestions from pattern");
                return Ok(pattern.successful_responses.first(limit));
            }
        }

        let fallback = self
            .store
            .positive_responses(emotion, target_emotion, language, limit)?;
        debug!(%emotion, %target_emotion, %language, found = fallback.len(), "suggestions from interactions");
        Ok(fallback)
    }

    pub fn statistics(&self) -> Result<MemoryStats> {
        self.store.statistics()
    }

    pub fn top_patterns(&self, language: Language, limit: usize) -> Result<Vec<EmotionPattern>> {
        self.store.top_patterns(language, limit)
    }

    pub fn reset(&self) -> Result<()> {
        self.store.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::{NewInteraction, RewardModel};

    fn remember(memory: &MemoryService, input: &str, from: Emotion, response: &str, to: Emotion, language: Language) {
        let record = RewardModel::new().score(NewInteraction::new(input, from, response, to, language));
        memory.store(&record).unwrap();
    }

    #[test]
    fn test_similar_orders_by_reward_then_recency() {
        let memory = MemoryService::in_memory().unwrap();
        remember(&memory, "first", Emotion::Sad, "r-neutral", Emotion::Neutral, Language::English);
        remember(&memory, "second", Emotion::Sad, "r-happy", Emotion::Happy, Language::English);
        remember(&memory, "third", Emotion::Sad, "r-neutral-2", Emotion::Neutral, Language::English);
        remember(&memory, "other", Emotion::Angry, "x", Emotion::Happy, Language::English);
        remember(&memory, "urdu", Emotion::Sad, "y", Emotion::Happy, Language::Urdu);

        let found = memory
            .similar_interactions("anything", Emotion::Sad, Language::English, 5)
            .unwrap();
        let inputs: Vec<&str> = found.iter().map(|i| i.user_input.as_str()).collect();
        assert_eq!(inputs, vec!["second", "third", "first"]);
    }

    #[test]
    fn test_suggestions_prefer_pattern() {
        let memory = MemoryService::in_memory().unwrap();
        for r in ["a", "b", "c", "d"] {
            remember(&memory, "hi", Emotion::Neutral, r, Emotion::Happy, Language::English);
        }

        let suggestions = memory
            .suggested_responses(Emotion::Neutral, Emotion::Happy, Language::English, 3)
            .unwrap();
        assert_eq!(suggestions, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_suggestions_empty_when_unknown() {
        let memory = MemoryService::in_memory().unwrap();
        remember(&memory, "hi", Emotion::Neutral, "meh", Emotion::Sad, Language::English);

        let suggestions = memory
            .suggested_responses(Emotion::Neutral, Emotion::Happy, Language::English, 3)
            .unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_suggestions_fall_back_to_interactions() {
        let memory = MemoryService::in_memory().unwrap();
        remember(&memory, "hi", Emotion::Sad, "You matter.", Emotion::Happy, Language::Hindi);
        remember(&memory, "hello", Emotion::Sad, "You matter.", Emotion::Happy, Language::Hindi);

        // Empty the pattern's response list while keeping the raw interaction
        memory
            .store_ref()
            .conn_for_tests()
            .execute("UPDATE emotion_patterns SET successful_responses = '[]'", [])
            .unwrap();

        let suggestions = memory
            .suggested_responses(Emotion::Sad, Emotion::Happy, Language::Hindi, 3)
            .unwrap();
        assert_eq!(suggestions, vec!["You matter."]);
    }
}
