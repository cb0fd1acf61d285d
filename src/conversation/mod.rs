//! Conversation turn driver
//!
//! One `Conversation` per chat session. Each turn:
//! classify → reward the previous transition → try a cached reply →
//! otherwise generate with memory augmentation → store the interaction →
//! append to the chat log.

mod chat_log;

pub use chat_log::{ChatLog, ChatLogEntry};

use crate::detection::EmotionClassifier;
use crate::emotion::{primary_emotion, Emotion, EmotionScore, Language};
use crate::generation::{Personality, ResponseGenerator};
use crate::learning::LearningCoordinator;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// What one turn produced
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub emotions: Vec<EmotionScore>,
    pub primary: Emotion,
    pub response: String,
    pub used_suggestion: bool,
    /// Reward for the transition from the previous turn, if one was scored
    pub transition_reward: Option<f64>,
}

struct PreviousTurn {
    user_input: String,
    emotion: Emotion,
}

pub struct Conversation {
    session_id: Uuid,
    classifier: Arc<dyn EmotionClassifier>,
    generator: Arc<dyn ResponseGenerator>,
    coordinator: LearningCoordinator,
    chat_log: Option<ChatLog>,
    language: Language,
    supported: Vec<Language>,
    personality: Personality,
    learning_enabled: bool,
    previous: Option<PreviousTurn>,
}

impl Conversation {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        generator: Arc<dyn ResponseGenerator>,
        coordinator: LearningCoordinator,
        language: Language,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            classifier,
            generator,
            coordinator,
            chat_log: None,
            language,
            supported: Language::ALL.to_vec(),
            personality: Personality::default(),
            learning_enabled: true,
            previous: None,
        }
    }

    pub fn with_chat_log(mut self, chat_log: ChatLog) -> Self {
        self.chat_log = Some(chat_log);
        self
    }

    /// Restrict `set_language` to these languages; an empty list is ignored
    pub fn with_supported_languages(mut self, supported: Vec<Language>) -> Self {
        if !supported.is_empty() {
            self.supported = supported;
        }
        self
    }

    pub fn with_personality(mut self, personality: Personality) -> Self {
        self.personality = personality;
        self
    }

    pub fn with_learning(mut self, enabled: bool) -> Self {
        self.learning_enabled = enabled;
        self
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn supported_languages(&self) -> &[Language] {
        &self.supported
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn learning_enabled(&self) -> bool {
        self.learning_enabled
    }

    pub fn coordinator(&self) -> &LearningCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut LearningCoordinator {
        &mut self.coordinator
    }

    /// Switch language; false when it is not supported
    pub fn set_language(&mut self, language: Language) -> bool {
        if !self.supported.contains(&language) {
            return false;
        }
        self.language = language;
        true
    }

    pub fn set_personality(&mut self, personality: Personality) {
        self.personality = personality;
    }

    /// Flip learning on or off, returning the new state
    pub fn toggle_learning(&mut self) -> bool {
        self.learning_enabled = !self.learning_enabled;
        self.learning_enabled
    }

    /// Run one chat turn
    pub async fn respond(&mut self, user_input: &str) -> TurnOutcome {
        let language = self.language;
        let emotions = self.classifier.classify(user_input, language).await;
        let primary = primary_emotion(&emotions);
        debug!(%primary, %language, "turn classified");

        let transition_reward = match (&self.previous, self.learning_enabled) {
            (Some(prev), true) => Some(self.coordinator.update(&prev.user_input, prev.emotion, primary, language)),
            _ => None,
        };

        let suggestion = if self.learning_enabled {
            self.coordinator.get_suggested_response(user_input, primary, language)
        } else {
            None
        };
        let used_suggestion = suggestion.is_some();

        let response = match suggestion {
            Some(cached) => cached,
            None => {
                let augmentation = if self.learning_enabled {
                    self.coordinator.enhance_prompt(user_input, primary, language)
                } else {
                    String::new()
                };
                let labels: Vec<Emotion> = emotions.iter().map(|e| e.label).collect();
                let augmentation = (!augmentation.is_empty()).then_some(augmentation.as_str());
                self.generator
                    .generate(user_input, &labels, language, self.personality, augmentation)
                    .await
            }
        };

        if self.learning_enabled {
            // The next emotion is not observed yet; the current one stands in
            if let Err(e) = self
                .coordinator
                .update_with_response_async(user_input, primary, &response, primary, language)
                .await
            {
                warn!(error = %e, "failed to store interaction");
            }
        }

        self.log_turn(user_input, &emotions, &response, used_suggestion);

        self.previous = Some(PreviousTurn {
            user_input: user_input.to_string(),
            emotion: primary,
        });

        TurnOutcome {
            emotions,
            primary,
            response,
            used_suggestion,
            transition_reward,
        }
    }

    fn log_turn(&self, user_input: &str, emotions: &[EmotionScore], response: &str, used_suggestion: bool) {
        let Some(chat_log) = &self.chat_log else {
            return;
        };

        let entry = ChatLogEntry {
            timestamp: Utc::now(),
            session_id: self.session_id,
            language: self.language,
            personality: self.personality,
            user_input: user_input.to_string(),
            emotions_detected: emotions.iter().map(|e| e.label).collect(),
            response: response.to_string(),
            used_suggestion,
            learning_enabled: self.learning_enabled,
        };

        if let Err(e) = chat_log.append(&entry) {
            warn!(error = %e, path = %chat_log.path().display(), "failed to append chat log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::{LearningSettings, RandomSource};
    use crate::memory::MemoryService;
    use crate::reward::RewardModel;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use tempfile::TempDir;

    /// Returns scripted labels in order
    struct ScriptedClassifier {
        labels: Mutex<VecDeque<Emotion>>,
    }

    impl ScriptedClassifier {
        fn new(labels: &[Emotion]) -> Arc<Self> {
            Arc::new(Self {
                labels: Mutex::new(labels.iter().copied().collect()),
            })
        }
    }

    #[async_trait]
    impl EmotionClassifier for ScriptedClassifier {
        async fn classify(&self, _text: &str, _language: Language) -> Vec<EmotionScore> {
            let label = self.labels.lock().pop_front().unwrap_or(Emotion::Neutral);
            vec![EmotionScore::new(label, 0.9)]
        }
    }

    /// Echoes its input and records the augmentation and persona it saw
    #[derive(Default)]
    struct EchoGenerator {
        augmentations: Mutex<Vec<Option<String>>>,
        personalities: Mutex<Vec<Personality>>,
    }

    #[async_trait]
    impl ResponseGenerator for EchoGenerator {
        async fn generate(
            &self,
            user_input: &str,
            _emotions: &[Emotion],
            language: Language,
            personality: Personality,
            augmentation: Option<&str>,
        ) -> String {
            self.augmentations.lock().push(augmentation.map(str::to_string));
            self.personalities.lock().push(personality);
            format!("[{}] {}", language, user_input)
        }
    }

    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }

        fn next_index(&mut self, _len: usize) -> usize {
            0
        }
    }

    fn coordinator(epsilon: f64) -> LearningCoordinator {
        let settings = LearningSettings {
            epsilon,
            ..LearningSettings::default()
        };
        LearningCoordinator::with_parts(
            Arc::new(MemoryService::in_memory().unwrap()),
            RewardModel::default(),
            settings,
            Box::new(Fixed(0.5)),
        )
    }

    #[tokio::test]
    async fn test_turn_flow_rewards_previous_transition() {
        let classifier = ScriptedClassifier::new(&[Emotion::Sad, Emotion::Happy]);
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = Conversation::new(classifier, generator.clone(), coordinator(1.0), Language::English);

        let first = chat.respond("I failed my exam").await;
        assert_eq!(first.primary, Emotion::Sad);
        assert_eq!(first.transition_reward, None);
        assert_eq!(first.response, "[english] I failed my exam");
        assert!(!first.used_suggestion);

        let second = chat.respond("thanks, I feel better").await;
        assert_eq!(second.primary, Emotion::Happy);
        assert_eq!(second.transition_reward, Some(0.8));

        let stats = chat.coordinator().statistics().unwrap();
        // two stored interactions plus one unpersisted transition update
        assert_eq!(stats.memory.total_interactions, 2);
        assert_eq!(stats.session_interactions, 3);

        // first turn had an empty memory, so no augmentation was passed
        assert_eq!(generator.augmentations.lock()[0], None);
    }

    #[tokio::test]
    async fn test_cached_reply_used_when_exploiting() {
        let classifier = ScriptedClassifier::new(&[Emotion::Neutral, Emotion::Neutral]);
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = Conversation::new(classifier, generator.clone(), coordinator(0.0), Language::English);

        chat.coordinator_mut()
            .update_with_response("hey", Emotion::Neutral, "Hi! Great to see you.", Emotion::Happy, Language::English)
            .unwrap();

        let outcome = chat.respond("hello").await;
        assert!(outcome.used_suggestion);
        assert_eq!(outcome.response, "Hi! Great to see you.");
        assert!(generator.augmentations.lock().is_empty());
    }

    #[tokio::test]
    async fn test_learning_disabled_skips_memory() {
        let classifier = ScriptedClassifier::new(&[Emotion::Angry, Emotion::Neutral]);
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = Conversation::new(classifier, generator, coordinator(0.0), Language::Hindi)
            .with_learning(false);

        chat.respond("ugh").await;
        let outcome = chat.respond("ok").await;
        assert_eq!(outcome.transition_reward, None);

        let stats = chat.coordinator().statistics().unwrap();
        assert_eq!(stats.memory.total_interactions, 0);
        assert_eq!(stats.session_interactions, 0);

        assert!(chat.toggle_learning());
        assert!(chat.learning_enabled());
    }

    #[tokio::test]
    async fn test_language_switch_and_chat_log() {
        let temp = TempDir::new().unwrap();
        let log = ChatLog::open(temp.path().join("chat.jsonl")).unwrap();

        let classifier = ScriptedClassifier::new(&[Emotion::Happy]);
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = Conversation::new(classifier, generator, coordinator(1.0), Language::English)
            .with_supported_languages(vec![Language::English, Language::Urdu])
            .with_chat_log(log.clone());

        assert!(!chat.set_language(Language::Punjabi));
        assert!(chat.set_language(Language::Urdu));

        let outcome = chat.respond("main khush hoon").await;
        assert_eq!(outcome.response, "[urdu] main khush hoon");

        let entries = log.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].session_id, chat.session_id());
        assert_eq!(entries[0].language, Language::Urdu);
        assert_eq!(entries[0].emotions_detected, vec![Emotion::Happy]);
        assert_eq!(entries[0].personality, Personality::Default);
        assert!(entries[0].learning_enabled);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_turn_on_multi_thread_runtime_stores_interaction() {
        let classifier = ScriptedClassifier::new(&[Emotion::Angry]);
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = Conversation::new(classifier, generator, coordinator(1.0), Language::English);

        chat.respond("this is broken").await;
        let stats = chat.coordinator().statistics().unwrap();
        assert_eq!(stats.memory.total_interactions, 1);
        assert_eq!(stats.memory.top_transitions[0].sequence, "angry->angry");
    }

    #[tokio::test]
    async fn test_personality_reaches_generator() {
        let classifier = ScriptedClassifier::new(&[Emotion::Sad, Emotion::Sad]);
        let generator = Arc::new(EchoGenerator::default());
        let mut chat = Conversation::new(classifier, generator.clone(), coordinator(1.0), Language::English)
            .with_personality(Personality::Therapist);
        assert_eq!(chat.personality(), Personality::Therapist);

        chat.respond("rough week").await;
        chat.set_personality(Personality::Poet);
        chat.respond("still rough").await;

        assert_eq!(
            *generator.personalities.lock(),
            vec![Personality::Therapist, Personality::Poet]
        );
    }
}
