//! Terminal rendering for the chat REPL and the reporting commands

use crate::emotion::{EmotionScore, Language};
use crate::generation::Personality;
use crate::learning::LearningStats;
use crate::memory::EmotionPattern;
use colored::*;

/// Responses quoted per pattern in reports
const RESPONSES_PER_PATTERN: usize = 2;

/// Characters of a quoted response in reports
const RESPONSE_PREVIEW_CHARS: usize = 50;

pub fn user_prompt(language: Language) -> &'static str {
    match language {
        Language::English => "You: ",
        Language::Urdu => "Aap: ",
        Language::Hindi => "आप: ",
        Language::Punjabi => "ਤੁਸੀਂ: ",
    }
}

pub fn bot_prefix(language: Language) -> &'static str {
    match language {
        Language::English | Language::Urdu => "Bot: ",
        Language::Hindi => "बॉट: ",
        Language::Punjabi => "ਬੋਟ: ",
    }
}

/// Show welcome banner
pub fn show_banner(version: &str, model: &str, language: Language, personality: Personality, learning: bool) {
    let width = 64;
    let rule = "=".repeat(width);
    let learning = if learning { "on" } else { "off" };

    println!("\n{}", rule.cyan());
    println!("{}", format!("  EmoBuddy {} - Emotion-Aware Chat", version).bold().cyan());
    println!(
        "{}",
        format!(
            "  Model: {} | Language: {} | Personality: {} | Learning: {}",
            model,
            language,
            personality.name(),
            learning
        )
        .dimmed()
    );
    println!("{}\n", rule.cyan());
    println!(
        "Type a message (or {} for commands, {} to quit)",
        "/help".green(),
        "/exit".green()
    );
}

pub fn show_help() {
    println!("\n{}", "Commands".bold().cyan());
    for (command, text) in [
        ("/stats", "Learning statistics"),
        ("/patterns [n]", "Most frequent learned patterns"),
        ("/reset", "Delete all learned data"),
        ("/lang [name]", "Show or change the conversation language"),
        ("/personality [id]", "Show or change the persona"),
        ("/learning", "Toggle learning on or off"),
        ("/help", "Show this help"),
        ("/exit", "Leave the chat"),
    ] {
        println!("  {} {}", format!("{:<18}", command).green(), text);
    }
    println!();
}

pub fn show_info(message: &str) {
    println!("{}", message.cyan());
}

pub fn show_success(message: &str) {
    println!("{}", message.green());
}

pub fn show_warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn show_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

/// Print the detected emotions and the reply
pub fn show_turn(language: Language, emotions: &[EmotionScore], response: &str, used_suggestion: bool) {
    println!("{}", format!("Detected Emotions: {}", emotion_labels(emotions)).blue());
    let marker = if used_suggestion { " (from memory)".dimmed().to_string() } else { String::new() };
    println!("{}{}{}", bot_prefix(language).magenta().bold(), response.magenta(), marker);
}

pub fn emotion_labels(emotions: &[EmotionScore]) -> String {
    emotions
        .iter()
        .map(|e| e.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Statistics report
pub fn render_stats(stats: &LearningStats) -> String {
    let memory = &stats.memory;
    let mut lines = vec![
        format!("{}", "Learning Statistics".bold().cyan()),
        format!("  total interactions:   {}", memory.total_interactions),
        format!("  average reward:       {:.3}", memory.average_reward),
        format!("  success rate:         {:.1}%", memory.success_rate),
        format!("  patterns learned:     {}", memory.patterns_learned),
        format!("  epsilon:              {}", stats.epsilon),
        format!("  learning rate:        {}", stats.learning_rate),
        format!("  gamma:                {}", stats.gamma),
        format!("  session interactions: {}", stats.session_interactions),
        format!("  session avg reward:   {:.3}", stats.session_average_reward),
    ];

    if !memory.top_transitions.is_empty() {
        lines.push(format!("{}", "  Top transitions".cyan()));
        for t in &memory.top_transitions {
            lines.push(format!("    {} [{}] x{}", t.sequence, t.language, t.count));
        }
    }

    lines.join("\n")
}

/// Persona list with the active one marked
pub fn render_personalities(current: Personality) -> String {
    let mut out = format!("{}\n", "Personalities".bold().cyan());
    for personality in Personality::ALL {
        let marker = if personality == current { "*" } else { " " };
        out.push_str(&format!(
            "{} {} {} - {}\n",
            marker,
            format!("{:<10}", personality.id()).green(),
            personality.name(),
            personality.description()
        ));
    }
    out
}

/// Pattern report for one language
pub fn render_patterns(patterns: &[EmotionPattern], language: Language) -> String {
    if patterns.is_empty() {
        return format!("No learned patterns for {} yet.", language);
    }

    let mut lines = vec![format!("{}", format!("Top Learned Patterns ({})", language).bold().cyan())];
    for pattern in patterns {
        lines.push(format!(
            "  {} (reward: {:.2}, count: {})",
            pattern.sequence, pattern.avg_reward, pattern.count
        ));
        for (i, response) in pattern.successful_responses.first(RESPONSES_PER_PATTERN).iter().enumerate() {
            lines.push(format!("    Response {}: {}", i + 1, preview(response)));
        }
    }

    lines.join("\n")
}

fn preview(text: &str) -> String {
    if text.chars().count() > RESPONSE_PREVIEW_CHARS {
        let head: String = text.chars().take(RESPONSE_PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}
