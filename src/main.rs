//! EmoBuddy - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use emobuddy::{
    cli::{Args, Commands},
    config::Config,
    conversation::{ChatLog, Conversation},
    detection::OllamaEmotionClassifier,
    generation::OllamaResponseGenerator,
    learning::LearningCoordinator,
    logging,
    memory::MemoryService,
    repl::{display, input::InputHandler, input::ReadOutcome, ChatRepl},
    store::PatternStore,
    streaming::OllamaClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    let _log_guard = logging::init(
        &config.log_dir(),
        &config.logging.level,
        logging::console_level(args.verbose),
    )
    .context("Failed to initialise logging")?;

    match args.command() {
        Commands::Chat => run_chat(&config).await?,
        Commands::Stats => show_stats(&config)?,
        Commands::Patterns { limit } => show_patterns(&config, limit)?,
        Commands::Reset { yes } => reset_memory(&config, yes)?,
        Commands::Config => show_config(&args, &config)?,
    }

    Ok(())
}

fn open_memory(config: &Config) -> Result<Arc<MemoryService>> {
    let path = config.database_path();
    let store = PatternStore::open(&path)
        .with_context(|| format!("Failed to open pattern database at {}", path.display()))?;
    Ok(Arc::new(MemoryService::new(store)))
}

async fn run_chat(config: &Config) -> Result<()> {
    let client = OllamaClient::with_config(
        &config.ollama_url(),
        &config.ollama.model,
        Duration::from_secs(config.ollama.timeout_secs),
    )?;

    if !client.health_check().await? {
        warn!(url = %config.ollama_url(), "ollama not reachable");
        display::show_warning(&format!(
            "Ollama is not reachable at {}; replies will fall back to canned messages. Start it with: ollama serve",
            config.ollama_url()
        ));
    }

    let memory = open_memory(config)?;
    let coordinator = LearningCoordinator::new(memory, config.learning_settings());
    let chat_log = ChatLog::open(config.chat_log_path()).context("Failed to open chat log")?;

    let conversation = Conversation::new(
        Arc::new(OllamaEmotionClassifier::new(client.clone())),
        Arc::new(OllamaResponseGenerator::new(client)),
        coordinator,
        config.default_language(),
    )
    .with_supported_languages(config.supported_languages()?)
    .with_personality(config.default_personality())
    .with_learning(config.learning.enabled)
    .with_chat_log(chat_log);

    let history = config.database_path().with_file_name("history");
    let mut repl = ChatRepl::new(conversation, config.ollama.model.clone(), Some(history))?;
    repl.run().await
}

fn show_stats(config: &Config) -> Result<()> {
    let coordinator = LearningCoordinator::new(open_memory(config)?, config.learning_settings());
    let stats = coordinator.statistics().context("Failed to read statistics")?;
    println!("{}", display::render_stats(&stats));
    Ok(())
}

fn show_patterns(config: &Config, limit: usize) -> Result<()> {
    let memory = open_memory(config)?;
    let language = config.default_language();
    let patterns = memory
        .top_patterns(language, limit)
        .context("Failed to read patterns")?;
    println!("{}", display::render_patterns(&patterns, language));
    Ok(())
}

fn reset_memory(config: &Config, yes: bool) -> Result<()> {
    if !yes {
        let mut input = InputHandler::new()?;
        let answer = input.ask("This will delete all learning data. Are you sure? (y/n): ")?;
        if !matches!(answer, ReadOutcome::Line(ref a) if a.eq_ignore_ascii_case("y")) {
            display::show_info("Reset cancelled.");
            return Ok(());
        }
    }

    let mut coordinator = LearningCoordinator::new(open_memory(config)?, config.learning_settings());
    if coordinator.reset() {
        display::show_success("Learning data has been reset.");
        Ok(())
    } else {
        Err(anyhow::anyhow!("Failed to reset learning data"))
    }
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    let source = match &args.config {
        Some(path) => path.display().to_string(),
        None => Config::default_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
    };

    println!("{} {}", "Configuration:".bold().cyan(), source.dimmed());
    println!("{}", toml::to_string_pretty(config).context("Failed to render configuration")?);
    Ok(())
}
