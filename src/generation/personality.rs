//! Conversation personas
//!
//! A persona sets the voice of generated replies. Its prompt opens the
//! generation prompt, with an extra style line for languages that need one.

use crate::emotion::Language;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Personality {
    #[default]
    Default,
    Therapist,
    Friend,
    Coach,
    Teacher,
    Poet,
}

impl Personality {
    pub const ALL: [Personality; 6] = [
        Personality::Default,
        Personality::Therapist,
        Personality::Friend,
        Personality::Coach,
        Personality::Teacher,
        Personality::Poet,
    ];

    /// Strict, case-insensitive parse of a persona id
    pub fn parse(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "default" => Some(Personality::Default),
            "therapist" => Some(Personality::Therapist),
            "friend" => Some(Personality::Friend),
            "coach" => Some(Personality::Coach),
            "teacher" => Some(Personality::Teacher),
            "poet" => Some(Personality::Poet),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Personality::Default => "default",
            Personality::Therapist => "therapist",
            Personality::Friend => "friend",
            Personality::Coach => "coach",
            Personality::Teacher => "teacher",
            Personality::Poet => "poet",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Personality::Default => "Default Assistant",
            Personality::Therapist => "Therapeutic Counselor",
            Personality::Friend => "Casual Friend",
            Personality::Coach => "Motivational Coach",
            Personality::Teacher => "Educational Guide",
            Personality::Poet => "Poetic Soul",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Personality::Default => {
                "A helpful, friendly, and empathetic assistant who responds to emotions appropriately."
            }
            Personality::Therapist => {
                "A compassionate listener focused on emotional well-being and supportive responses."
            }
            Personality::Friend => {
                "A casual and friendly conversational partner who uses more informal language."
            }
            Personality::Coach => {
                "An energetic and encouraging persona focused on motivation and positive thinking."
            }
            Personality::Teacher => {
                "A knowledgeable and patient educator who explains concepts clearly."
            }
            Personality::Poet => {
                "A creative and expressive personality who responds with more poetic and descriptive language."
            }
        }
    }

    fn instructions(&self) -> &'static str {
        match self {
            Personality::Default => {
                "You are a helpful, friendly, and empathetic assistant. Your responses should be informative,\n\
                 supportive, and tailored to the emotional state of the user."
            }
            Personality::Therapist => {
                "You are a compassionate therapeutic counselor. Focus on validating the user's emotions,\n\
                 practicing active listening, and providing gentle guidance toward emotional well-being.\n\
                 Use a calm, supportive tone and ask meaningful follow-up questions that encourage\n\
                 self-reflection. Avoid giving direct advice, instead helping the user find their own insights."
            }
            Personality::Friend => {
                "You are a casual, friendly conversational partner. Use informal language, light humor when\n\
                 appropriate, and respond as if chatting with a friend. Be supportive but not overly formal.\n\
                 Feel free to share relatable (fictional) experiences to build rapport, and use occasional\n\
                 slang or conversational expressions that friends might use with each other."
            }
            Personality::Coach => {
                "You are an energetic motivational coach. Your responses should be encouraging, action-oriented,\n\
                 and focused on growth. Use dynamic language that inspires confidence and motivation.\n\
                 Offer practical suggestions, positive reinforcement, and focus on strengths and possibilities\n\
                 rather than limitations. Use energetic punctuation and encouraging phrases!"
            }
            Personality::Teacher => {
                "You are a patient and knowledgeable educational guide. Explain concepts clearly and thoroughly,\n\
                 breaking down complex ideas into understandable parts. Use analogies and examples to illustrate points.\n\
                 Ask checking questions to ensure understanding, and present information in a structured, logical way.\n\
                 Focus on being informative and educational without being condescending."
            }
            Personality::Poet => {
                "You are a poetic and expressive soul. Your responses should incorporate more vivid imagery,\n\
                 metaphors, and expressive language. Occasionally include short poetic phrases or observations\n\
                 about life and emotions. Your language should be more flowery and descriptive than usual,\n\
                 painting pictures with words while still addressing the user's needs."
            }
        }
    }

    /// Extra style line for a language, if it has one
    pub fn adaptation(&self, language: Language) -> Option<&'static str> {
        let line = match (language, self) {
            (Language::Urdu, Personality::Default) => {
                "Maintain a helpful and respectful tone, using Roman Urdu that is clear and accessible."
            }
            (Language::Urdu, Personality::Therapist) => {
                "Use gentle, supportive Roman Urdu with respectful terms like 'aap' rather than 'tum'."
            }
            (Language::Urdu, Personality::Friend) => {
                "Use casual Roman Urdu with friendly expressions and colloquialisms common among friends."
            }
            (Language::Urdu, Personality::Coach) => {
                "Use motivational phrases and energetic expressions in Roman Urdu."
            }
            (Language::Urdu, Personality::Teacher) => {
                "Use clear explanations with occasional English terms as would be common in educational settings."
            }
            (Language::Urdu, Personality::Poet) => {
                "Incorporate Urdu poetic traditions, using more expressive and literary Roman Urdu."
            }
            (Language::Hindi, Personality::Default) => "Use respectful Hindi with appropriate honorifics.",
            (Language::Hindi, Personality::Therapist) => {
                "Use supportive and gentle Hindi with respectful forms of address."
            }
            (Language::Hindi, Personality::Friend) => "Use casual Hindi with friendly colloquialisms.",
            (Language::Hindi, Personality::Coach) => "Use energetic Hindi with motivational expressions.",
            (Language::Hindi, Personality::Teacher) => {
                "Use clear, educational Hindi with occasional English terms."
            }
            (Language::Hindi, Personality::Poet) => "Use more literary and poetic Hindi expressions.",
            _ => return None,
        };
        Some(line)
    }

    /// Persona prompt for a language
    pub fn prompt(&self, language: Language) -> String {
        match self.adaptation(language) {
            Some(line) => format!("{}\n\nFor {} language: {}", self.instructions(), language, line),
            None => self.instructions().to_string(),
        }
    }
}

impl fmt::Display for Personality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
