//! Slash commands available inside the chat

/// REPL command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Stats,
    Patterns { limit: usize },
    Reset,
    /// `/lang` with no argument lists the supported languages
    Language { name: Option<String> },
    /// `/personality` with no argument lists the personas
    Personality { id: Option<String> },
    Learning,
    Exit,
    Unknown { input: String },
}

/// Patterns shown by `/patterns` without an argument
pub const DEFAULT_PATTERN_LIMIT: usize = 3;

/// Parse a line into a command. Returns `None` for ordinary chat text.
///
/// Bare `exit`, `quit` and `bye` also end the chat.
pub fn parse(input: &str) -> Option<Command> {
    let trimmed = input.trim();

    if matches!(trimmed.to_lowercase().as_str(), "exit" | "quit" | "bye") {
        return Some(Command::Exit);
    }

    let body = trimmed.strip_prefix('/')?;
    let parts: Vec<&str> = body.split_whitespace().collect();
    let Some(name) = parts.first() else {
        return Some(Command::Unknown {
            input: input.to_string(),
        });
    };

    let command = match name.to_lowercase().as_str() {
        "help" | "h" | "menu" | "options" => Command::Help,
        "stats" => Command::Stats,
        "patterns" => Command::Patterns {
            limit: parts
                .get(1)
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PATTERN_LIMIT),
        },
        "reset" => Command::Reset,
        "lang" | "language" => Command::Language {
            name: parts.get(1).map(|s| s.to_string()),
        },
        "personality" | "persona" => Command::Personality {
            id: parts.get(1).map(|s| s.to_string()),
        },
        "learning" | "rl" => Command::Learning,
        "exit" | "quit" | "q" => Command::Exit,
        _ => Command::Unknown {
            input: input.to_string(),
        },
    };

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_text_is_not_a_command() {
        assert_eq!(parse("I had a rough day"), None);
        assert_eq!(parse("exit strategy?"), None);
    }

    #[test]
    fn test_exit_words() {
        assert_eq!(parse("bye"), Some(Command::Exit));
        assert_eq!(parse(" QUIT "), Some(Command::Exit));
        assert_eq!(parse("/q"), Some(Command::Exit));
    }

    #[test]
    fn test_patterns_limit() {
        assert_eq!(parse("/patterns"), Some(Command::Patterns { limit: 3 }));
        assert_eq!(parse("/patterns 10"), Some(Command::Patterns { limit: 10 }));
        assert_eq!(parse("/patterns many"), Some(Command::Patterns { limit: 3 }));
    }

    #[test]
    fn test_language() {
        assert_eq!(
            parse("/lang ur"),
            Some(Command::Language {
                name: Some("ur".to_string())
            })
        );
        assert_eq!(parse("/lang"), Some(Command::Language { name: None }));
    }

    #[test]
    fn test_personality() {
        assert_eq!(
            parse("/personality coach"),
            Some(Command::Personality {
                id: Some("coach".to_string())
            })
        );
        assert_eq!(parse("/persona"), Some(Command::Personality { id: None }));
    }

    #[test]
    fn test_unknown() {
        assert!(matches!(parse("/dance"), Some(Command::Unknown { .. })));
        assert!(matches!(parse("/"), Some(Command::Unknown { .. })));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("/stats"), Some(Command::Stats));
        assert_eq!(parse("/reset"), Some(Command::Reset));
        assert_eq!(parse("/learning"), Some(Command::Learning));
        assert_eq!(parse("/menu"), Some(Command::Help));
    }
}
