//! Response generation
//!
//! `ResponseGenerator` produces the bot's reply from the user input, the
//! detected emotions, the active persona and an optional memory block. Generation never fails
//! outward: transport problems become a canned apology.

pub mod personality;
pub mod prompts;

pub use personality::Personality;

use crate::emotion::{Emotion, Language};
use crate::streaming::OllamaClient;
use async_trait::async_trait;
use tracing::{debug, warn};

#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(
        &self,
        user_input: &str,
        emotions: &[Emotion],
        language: Language,
        personality: Personality,
        augmentation: Option<&str>,
    ) -> String;
}

/// Generator that streams replies from an Ollama model
pub struct OllamaResponseGenerator {
    client: OllamaClient,
}

impl OllamaResponseGenerator {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResponseGenerator for OllamaResponseGenerator {
    async fn generate(
        &self,
        user_input: &str,
        emotions: &[Emotion],
        language: Language,
        personality: Personality,
        augmentation: Option<&str>,
    ) -> String {
        if user_input.trim().is_empty() {
            return prompts::greeting(language).to_string();
        }

        let prompt = prompts::full_prompt(user_input, emotions, language, personality, augmentation);
        debug!(
            %language,
            %personality,
            augmented = augmentation.map_or(false, |a| !a.is_empty()),
            "generating response"
        );

        match self.client.generate_collected(&prompt, None).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                warn!("model returned an empty response");
                prompts::apology(language).to_string()
            }
            Err(e) => {
                warn!(error = %e, "response generation failed");
                prompts::apology(language).to_string()
            }
        }
    }
}
