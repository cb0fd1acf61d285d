//! Emotion and language vocabularies
//!
//! Both are closed sets. Parsing never fails: unknown emotion labels
//! collapse to `Neutral`, unknown language identifiers to a default.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detected affective state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
}

impl Emotion {
    /// All emotions in table order
    pub const ALL: [Emotion; 4] = [Emotion::Neutral, Emotion::Happy, Emotion::Sad, Emotion::Angry];

    /// Parse a label, coercing anything unrecognised to `Neutral`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "happy" => Emotion::Happy,
            "sad" => Emotion::Sad,
            "angry" => Emotion::Angry,
            _ => Emotion::Neutral,
        }
    }

    /// Lowercase label used for storage and display
    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
        }
    }

    /// Row/column position in the reward table
    pub(crate) fn index(&self) -> usize {
        match self {
            Emotion::Neutral => 0,
            Emotion::Happy => 1,
            Emotion::Sad => 2,
            Emotion::Angry => 3,
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Emotion {
    fn from(label: &str) -> Self {
        Emotion::from_label(label)
    }
}

/// Serialized `"<from>-><to>"` key of an emotion transition
pub fn sequence_key(from: Emotion, to: Emotion) -> String {
    format!("{}->{}", from, to)
}

/// Conversation language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Urdu,
    Hindi,
    Punjabi,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Urdu,
        Language::Hindi,
        Language::Punjabi,
    ];

    /// Strict parse of a canonical name or ISO-639-1 alias
    pub fn parse(identifier: &str) -> Option<Self> {
        match identifier.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Some(Language::English),
            "urdu" | "ur" => Some(Language::Urdu),
            "hindi" | "hi" => Some(Language::Hindi),
            "punjabi" | "pa" => Some(Language::Punjabi),
            _ => None,
        }
    }

    /// Lenient parse: unknown identifiers fall back to `default`
    pub fn parse_or(identifier: &str, default: Language) -> Self {
        Self::parse(identifier).unwrap_or(default)
    }

    /// Canonical lowercase name used for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Urdu => "urdu",
            Language::Hindi => "hindi",
            Language::Punjabi => "punjabi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Language {
    fn from(identifier: &str) -> Self {
        Language::parse_or(identifier, Language::default())
    }
}

/// One classifier verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub label: Emotion,
    pub score: f64,
}

impl EmotionScore {
    pub fn new(label: Emotion, score: f64) -> Self {
        Self { label, score }
    }
}

/// First label of a classifier result, `Neutral` when empty
pub fn primary_emotion(scores: &[EmotionScore]) -> Emotion {
    scores.first().map(|s| s.label).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_emotion_is_neutral() {
        assert_eq!(Emotion::from_label("confused"), Emotion::Neutral);
        assert_eq!(Emotion::from_label(""), Emotion::Neutral);
        assert_eq!(Emotion::from_label("  ANGRY "), Emotion::Angry);
    }

    #[test]
    fn test_language_aliases() {
        assert_eq!(Language::from("en"), Language::English);
        assert_eq!(Language::from("Urdu"), Language::Urdu);
        assert_eq!(Language::from("pa"), Language::Punjabi);
        assert_eq!(Language::parse("klingon"), None);
        assert_eq!(Language::parse_or("klingon", Language::Hindi), Language::Hindi);
    }

    #[test]
    fn test_sequence_key() {
        assert_eq!(sequence_key(Emotion::Sad, Emotion::Happy), "sad->happy");
    }

    #[test]
    fn test_primary_emotion() {
        assert_eq!(primary_emotion(&[]), Emotion::Neutral);
        let scores = vec![
            EmotionScore::new(Emotion::Angry, 0.9),
            EmotionScore::new(Emotion::Sad, 0.9),
        ];
        assert_eq!(primary_emotion(&scores), Emotion::Angry);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Emotion::Happy).unwrap();
        assert_eq!(json, "\"happy\"");
        let lang: Language = serde_json::from_str("\"punjabi\"").unwrap();
        assert_eq!(lang, Language::Punjabi);
    }
}
