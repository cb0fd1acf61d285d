//! Memory-augmented prompt block handed to the response generator

use crate::emotion::Emotion;
use crate::memory::Interaction;

/// Past interactions quoted in one augmentation block
pub const MAX_PROMPT_EXAMPLES: usize = 3;

/// Assemble the augmentation text.
///
/// Returns an empty string when there are neither similar interactions nor
/// suggestions; the target statement is only added alongside memory.
pub fn build_augmentation(similar: &[Interaction], suggestions: &[String], target: Emotion) -> String {
    if similar.is_empty() && suggestions.is_empty() {
        return String::new();
    }

    let mut sections = Vec::with_capacity(3);

    if !similar.is_empty() {
        let examples: Vec<String> = similar
            .iter()
            .take(MAX_PROMPT_EXAMPLES)
            .map(|i| {
                format!(
                    "User input: \"{}\"\nResponse: \"{}\"\nResult: User went from {} to {}",
                    i.user_input, i.response, i.emotion, i.next_emotion
                )
            })
            .collect();
        sections.push(format!(
            "Here are some similar past interactions:\n{}",
            examples.join("\n")
        ));
    }

    if !suggestions.is_empty() {
        let lines: Vec<String> = suggestions.iter().map(|s| format!("- \"{}\"", s)).collect();
        sections.push(format!(
            "These response patterns have worked well in the past for this emotional transition:\n{}",
            lines.join("\n")
        ));
    }

    sections.push(format!(
        "The ideal target emotion for this interaction is: {}",
        target
    ));

    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::Language;
    use chrono::Utc;

    fn interaction(id: i64, input: &str) -> Interaction {
        Interaction {
            id,
            user_input: input.to_string(),
            emotion: Emotion::Sad,
            response: format!("reply to {}", input),
            next_emotion: Emotion::Happy,
            reward: 0.8,
            language: Language::English,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_memory_gives_empty_block() {
        assert_eq!(build_augmentation(&[], &[], Emotion::Happy), "");
    }

    #[test]
    fn test_caps_examples_at_three() {
        let similar: Vec<Interaction> = (0..5).map(|i| interaction(i, &format!("q{}", i))).collect();
        let block = build_augmentation(&similar, &[], Emotion::Happy);
        assert_eq!(block.matches("User input:").count(), MAX_PROMPT_EXAMPLES);
        assert!(block.contains("Result: User went from sad to happy"));
        assert!(block.ends_with("The ideal target emotion for this interaction is: happy"));
    }

    #[test]
    fn test_suggestions_section() {
        let block = build_augmentation(&[], &["Keep going!".to_string()], Emotion::Neutral);
        assert_eq!(
            block,
            "These response patterns have worked well in the past for this emotional transition:\n\
             - \"Keep going!\"\n\n\
             The ideal target emotion for this interaction is: neutral"
        );
    }
}
