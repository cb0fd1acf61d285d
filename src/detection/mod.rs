//! Emotion detection
//!
//! `EmotionClassifier` turns user text into an ordered list of scored
//! labels; the first entry is treated as the primary emotion. The Ollama
//! implementation asks the model for a single label and scans the reply.

use crate::emotion::{Emotion, EmotionScore, Language};
use crate::streaming::{GenerateOptions, OllamaClient};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Score for a label the model named
pub const MATCHED_SCORE: f64 = 0.9;

/// Score for the neutral fallback when the reply named nothing usable
pub const UNMATCHED_SCORE: f64 = 0.7;

/// Score for the neutral fallback on empty input or transport failure
pub const CERTAIN_SCORE: f64 = 1.0;

/// Labels scanned for in a classifier reply, in reporting order
const REPORT_ORDER: [Emotion; 4] = [Emotion::Happy, Emotion::Sad, Emotion::Neutral, Emotion::Angry];

#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Scored labels for `text`, never empty
    async fn classify(&self, text: &str, language: Language) -> Vec<EmotionScore>;
}

/// Classifier backed by an Ollama model
pub struct OllamaEmotionClassifier {
    client: OllamaClient,
}

impl OllamaEmotionClassifier {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    fn options() -> GenerateOptions {
        GenerateOptions {
            temperature: Some(0.1),
            num_predict: Some(50),
        }
    }
}

#[async_trait]
impl EmotionClassifier for OllamaEmotionClassifier {
    async fn classify(&self, text: &str, language: Language) -> Vec<EmotionScore> {
        if text.trim().is_empty() {
            return certain_neutral();
        }

        let prompt = detection_prompt(text, language);
        match self.client.generate(&prompt, Some(Self::options())).await {
            Ok(reply) => {
                let scores = parse_reply(&reply);
                debug!(reply = %reply.trim(), primary = %scores[0].label, "emotion classified");
                scores
            }
            Err(e) => {
                warn!(error = %e, "emotion detection failed, assuming neutral");
                certain_neutral()
            }
        }
    }
}

/// Scan a model reply for known labels.
///
/// Every label mentioned becomes a `MATCHED_SCORE` entry. With no match
/// the result is a single neutral entry.
pub fn parse_reply(reply: &str) -> Vec<EmotionScore> {
    let lowered = reply.trim().to_lowercase();

    let found: Vec<EmotionScore> = REPORT_ORDER
        .iter()
        .filter(|emotion| lowered.contains(emotion.as_str()))
        .map(|&emotion| EmotionScore::new(emotion, MATCHED_SCORE))
        .collect();

    if found.is_empty() {
        vec![EmotionScore::new(Emotion::Neutral, UNMATCHED_SCORE)]
    } else {
        found
    }
}

fn certain_neutral() -> Vec<EmotionScore> {
    vec![EmotionScore::new(Emotion::Neutral, CERTAIN_SCORE)]
}

/// Per-language instruction asking for exactly one label
pub fn detection_prompt(text: &str, language: Language) -> String {
    match language {
        Language::English => format!(
            "\nAnalyze the following text and detect the primary emotion.\n\
             Text: \"{text}\"\n\
             Choose exactly one emotion from these options: happy, sad, neutral, angry.\n\
             Only respond with the emotion name, nothing else:\n"
        ),
        Language::Urdu => format!(
            "\nAnalyze the following Roman Urdu text and detect the primary emotion.\n\
             Text: \"{text}\"\n\
             Choose exactly one emotion from these options: happy, sad, neutral, angry.\n\
             Only respond with the emotion name, nothing else:\n"
        ),
        Language::Hindi => format!(
            "\nनिम्नलिखित टेक्स्ट का विश्लेषण करें और प्राथमिक भावना का पता लगाएं।\n\
             टेक्स्ट: \"{text}\"\n\
             इन विकल्पों में से एक भावना चुनें: happy, sad, neutral, angry।\n\
             केवल भावना के नाम के साथ प्रतिक्रिया दें, कुछ और नहीं:\n"
        ),
        Language::Punjabi => format!(
            "\nਹੇਠਾਂ ਦਿੱਤੇ ਟੈਕਸਟ ਦਾ ਵਿਸ਼ਲੇਸ਼ਣ ਕਰੋ ਅਤੇ ਮੁੱਖ ਭਾਵਨਾ ਦਾ ਪਤਾ ਲਗਾਓ।\n\
             ਟੈਕਸਟ: \"{text}\"\n\
             ਇਹਨਾਂ ਵਿਕਲਪਾਂ ਵਿੱਚੋਂ ਇੱਕ ਭਾਵਨਾ ਚੁਣੋ: happy, sad, neutral, angry।\n\
             ਸਿਰਫ ਭਾਵਨਾ ਦੇ ਨਾਮ ਨਾਲ ਜਵਾਬ ਦਿਓ, ਹੋਰ ਕੁਝ ਨਹੀਂ:\n"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(scores: &[EmotionScore]) -> Vec<Emotion> {
        scores.iter().map(|s| s.label).collect()
    }

    #[test]
    fn test_single_label() {
        let scores = parse_reply("  Sad\n");
        assert_eq!(labels(&scores), vec![Emotion::Sad]);
        assert_eq!(scores[0].score, MATCHED_SCORE);
    }

    #[test]
    fn test_multiple_labels_in_report_order() {
        let scores = parse_reply("angry, maybe happy");
        assert_eq!(labels(&scores), vec![Emotion::Happy, Emotion::Angry]);
    }

    #[test]
    fn test_no_label_falls_back_to_neutral() {
        let scores = parse_reply("I cannot tell");
        assert_eq!(labels(&scores), vec![Emotion::Neutral]);
        assert_eq!(scores[0].score, UNMATCHED_SCORE);
    }

    #[test]
    fn test_neutral_reply_scores_high() {
        let scores = parse_reply("Neutral.");
        assert_eq!(labels(&scores), vec![Emotion::Neutral]);
        assert_eq!(scores[0].score, MATCHED_SCORE);
    }

    #[test]
    fn test_prompts_embed_text() {
        for language in Language::ALL {
            let prompt = detection_prompt("main khush hoon", language);
            assert!(prompt.contains("\"main khush hoon\""), "{}", language);
        }
        assert!(detection_prompt("x", Language::Urdu).contains("Roman Urdu"));
    }

    #[tokio::test]
    async fn test_empty_input_is_certain_neutral() {
        let client = OllamaClient::new().unwrap();
        let classifier = OllamaEmotionClassifier::new(client);
        let scores = classifier.classify("   ", Language::English).await;
        assert_eq!(labels(&scores), vec![Emotion::Neutral]);
        assert_eq!(scores[0].score, CERTAIN_SCORE);
    }
}
