//! Per-language generation prompts and canned replies

use super::personality::Personality;
use crate::emotion::{Emotion, Language};

/// Persona prompt followed by the user's words and detected emotions
pub fn base_prompt(user_input: &str, emotions: &[Emotion], language: Language, personality: Personality) -> String {
    let labels = emotions
        .iter()
        .map(|e| e.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let persona = personality.prompt(language);

    match language {
        Language::English => format!(
            "\n{persona}\n\n\
             User said: \"{user_input}\"\n\
             Detected emotions: {labels}\n\n\
             Generate a considerate response in English that acknowledges the user's emotions and provides appropriate support or engagement.\n\
             Keep your response concise (1-3 sentences):\n"
        ),
        Language::Urdu => format!(
            "\n{persona}\n\n\
             User said (in Roman Urdu): \"{user_input}\"\n\
             Detected emotions: {labels}\n\n\
             Generate a considerate response in ROMAN URDU that acknowledges the user's emotions and provides appropriate support or engagement.\n\
             Use simple Roman Urdu (English alphabet to write Urdu) so it's easy to read.\n\
             Keep your response concise (1-3 sentences):\n"
        ),
        Language::Hindi => format!(
            "\n{persona}\n\n\
             उपयोगकर्ता ने कहा: \"{user_input}\"\n\
             पता चली भावनाएँ: {labels}\n\n\
             हिंदी में एक विचारशील प्रतिक्रिया दें जो उपयोगकर्ता की भावनाओं को स्वीकार करती है और उचित समर्थन या जुड़ाव प्रदान करती है।\n\
             अपनी प्रतिक्रिया को संक्षिप्त रखें (1-3 वाक्य):\n"
        ),
        Language::Punjabi => format!(
            "\n{persona}\n\n\
             ਉਪਭੋਗਤਾ ਨੇ ਕਿਹਾ: \"{user_input}\"\n\
             ਪਤਾ ਲੱਗੀਆਂ ਭਾਵਨਾਵਾਂ: {labels}\n\n\
             ਪੰਜਾਬੀ ਵਿੱਚ ਇੱਕ ਵਿਚਾਰਸ਼ੀਲ ਜਵਾਬ ਤਿਆਰ ਕਰੋ ਜੋ ਉਪਭੋਗਤਾ ਦੀਆਂ ਭਾਵਨਾਵਾਂ ਨੂੰ ਸਵੀਕਾਰ ਕਰਦਾ ਹੈ ਅਤੇ ਢੁਕਵੀਂ ਸਹਾਇਤਾ ਜਾਂ ਸ਼ਮੂਲੀਅਤ ਪ੍ਰਦਾਨ ਕਰਦਾ ਹੈ।\n\
             ਆਪਣੇ ਜਵਾਬ ਨੂੰ ਸੰਖੇਪ ਰੱਖੋ (1-3 ਵਾਕ):\n"
        ),
    }
}

/// Base prompt with the memory block appended when there is one
pub fn full_prompt(
    user_input: &str,
    emotions: &[Emotion],
    language: Language,
    personality: Personality,
    augmentation: Option<&str>,
) -> String {
    let mut prompt = base_prompt(user_input, emotions, language, personality);
    if let Some(extra) = augmentation.filter(|a| !a.trim().is_empty()) {
        prompt.push_str("\n\n");
        prompt.push_str(extra);
    }
    prompt
}

/// Reply for empty input
pub fn greeting(language: Language) -> &'static str {
    match language {
        Language::English => "Hello! How are you feeling today?",
        Language::Urdu => "آداب! آج آپ کیسا محسوس کر رہے ہیں؟",
        Language::Hindi => "नमस्ते! आज आप कैसा महसूस कर रहे हैं?",
        Language::Punjabi => "ਸਤ ਸ੍ਰੀ ਅਕਾਲ! ਅੱਜ ਤੁਸੀਂ ਕਿਵੇਂ ਮਹਿਸੂਸ ਕਰ ਰਹੇ ਹੋ?",
    }
}

/// Reply when the model could not be reached
pub fn apology(language: Language) -> &'static str {
    match language {
        Language::English => "I'm sorry, I'm having trouble processing that. Could you try again?",
        Language::Urdu => "معذرت، مجھے اس کی پروسیسنگ میں دشواری ہو رہی ہے۔ کیا آپ دوبارہ کوشش کر سکتے ہیں؟",
        Language::Hindi => "मुझे खेद है, मुझे इसे संसाधित करने में परेशानी हो रही है। क्या आप फिर से प्रयास कर सकते हैं?",
        Language::Punjabi => "ਮੈਨੂੰ ਮਾਫ਼ ਕਰਨਾ, ਮੈਨੂੰ ਇਸ ਨੂੰ ਪ੍ਰੋਸੈਸ ਕਰਨ ਵਿੱਚ ਮੁਸ਼ਕਲ ਹੋ ਰਹੀ ਹੈ। ਕੀ ਤੁਸੀਂ ਦੁਬਾਰਾ ਕੋਸ਼ਿਸ਼ ਕਰ ਸਕਦੇ ਹੋ?",
    }
}

/// Session greeting shown when the chat starts
pub fn welcome(language: Language) -> &'static str {
    match language {
        Language::English => "Welcome to the multilingual emotion chatbot! How are you feeling today?",
        Language::Urdu => "Multilingual emotion chatbot mein khush amdeed! Aaj aap kaisa mehsoos kar rahe hain?",
        Language::Hindi => "बहुभाषी भावना चैटबॉट में आपका स्वागत है! आज आप कैसा महसूस कर रहे हैं?",
        Language::Punjabi => "ਬਹੁਭਾਸ਼ੀ ਭਾਵਨਾ ਚੈਟਬੋਟ ਵਿੱਚ ਤੁਹਾਡਾ ਸਵਾਗਤ ਹੈ! ਅੱਜ ਤੁਸੀਂ ਕਿਵੇਂ ਮਹਿਸੂਸ ਕਰ ਰਹੇ ਹੋ?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_prompt_lists_emotions() {
        let prompt = base_prompt(
            "I failed my exam",
            &[Emotion::Sad, Emotion::Angry],
            Language::English,
            Personality::Default,
        );
        assert!(prompt.contains("User said: \"I failed my exam\""));
        assert!(prompt.contains("Detected emotions: sad, angry"));
    }

    #[test]
    fn test_base_prompt_opens_with_persona() {
        let persona = Personality::Coach.prompt(Language::Urdu);
        let prompt = base_prompt("kal interview hai", &[Emotion::Neutral], Language::Urdu, Personality::Coach);
        assert!(prompt.starts_with(&format!("\n{}\n\nUser said (in Roman Urdu):", persona)));
        assert!(prompt.contains("For urdu language: Use motivational phrases"));

        let poet = base_prompt("ਹੈਲੋ", &[Emotion::Happy], Language::Punjabi, Personality::Poet);
        assert!(poet.starts_with("\nYou are a poetic and expressive soul."));
        assert!(poet.contains("ਉਪਭੋਗਤਾ ਨੇ ਕਿਹਾ: \"ਹੈਲੋ\""));
    }

    #[test]
    fn test_personas_change_the_prompt() {
        let default = base_prompt("hi", &[Emotion::Happy], Language::English, Personality::Default);
        let friend = base_prompt("hi", &[Emotion::Happy], Language::English, Personality::Friend);
        assert_ne!(default, friend);
        assert!(friend.contains("casual, friendly conversational partner"));
    }

    #[test]
    fn test_full_prompt_appends_augmentation() {
        let base = base_prompt("hi", &[Emotion::Neutral], Language::Urdu, Personality::Therapist);
        let full = full_prompt("hi", &[Emotion::Neutral], Language::Urdu, Personality::Therapist, Some("MEMORY"));
        assert_eq!(full, format!("{}\n\nMEMORY", base));
    }

    #[test]
    fn test_full_prompt_ignores_empty_augmentation() {
        let p = Personality::Default;
        let base = base_prompt("hi", &[Emotion::Happy], Language::Hindi, p);
        assert_eq!(full_prompt("hi", &[Emotion::Happy], Language::Hindi, p, Some("")), base);
        assert_eq!(full_prompt("hi", &[Emotion::Happy], Language::Hindi, p, None), base);
    }

    #[test]
    fn test_canned_replies_exist_for_every_language() {
        for language in Language::ALL {
            assert!(!greeting(language).is_empty());
            assert!(!apology(language).is_empty());
            assert!(!welcome(language).is_empty());
        }
    }
}
