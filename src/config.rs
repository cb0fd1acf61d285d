//! Configuration management for EmoBuddy
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.emobuddy/config.toml

use crate::emotion::Language;
use crate::errors::{AgentError, Result};
use crate::generation::Personality;
use crate::learning::LearningSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete configuration for EmoBuddy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaConfig,
    #[serde(default)]
    pub learning: LearningConfig,
    #[serde(default)]
    pub language: LanguageConfig,
    #[serde(default)]
    pub personality: PersonalityConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ollama connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    pub host: String,
    pub port: u16,
    pub model: String,
    pub timeout_secs: u64,
}

/// Reinforcement loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub enabled: bool,
    pub epsilon: f64,
    pub learning_rate: f64,
    pub gamma: f64,
    pub similar_limit: usize,
    pub suggestion_limit: usize,
}

/// Conversation language configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    pub default: String,
    pub supported: Vec<String>,
}

/// Persona configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityConfig {
    pub default: String,
}

/// File system paths configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub database: String,
    pub log_dir: String,
    pub chat_log: String,
}

/// Log output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11434,
            model: "qwen2.5:7b-instruct".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for LearningConfig {
    fn default() -> Self {
        let settings = LearningSettings::default();
        Self {
            enabled: true,
            epsilon: settings.epsilon,
            learning_rate: settings.learning_rate,
            gamma: settings.gamma,
            similar_limit: settings.similar_limit,
            suggestion_limit: settings.suggestion_limit,
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            default: Language::English.as_str().to_string(),
            supported: Language::ALL.iter().map(|l| l.as_str().to_string()).collect(),
        }
    }
}

impl Default for PersonalityConfig {
    fn default() -> Self {
        Self {
            default: Personality::default().id().to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            database: "~/.emobuddy/memory.db".to_string(),
            log_dir: "~/.emobuddy/logs".to_string(),
            chat_log: "~/.emobuddy/chat_log.jsonl".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(config_path) => Self::load_from_file(config_path),
            None => Self::load_default(),
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| AgentError::ConfigError(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| AgentError::ConfigError(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from the standard location, or built-in defaults when absent
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// ~/.emobuddy/config.toml
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".emobuddy").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.ollama.host.trim().is_empty() {
            return Err(AgentError::ConfigError("ollama host must not be empty".to_string()));
        }

        if self.ollama.port == 0 {
            return Err(AgentError::ConfigError("ollama port must be greater than 0".to_string()));
        }

        if self.ollama.model.trim().is_empty() {
            return Err(AgentError::ConfigError("ollama model must not be empty".to_string()));
        }

        if !(0.0..=1.0).contains(&self.learning.epsilon) {
            return Err(AgentError::ConfigError(
                "epsilon must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.learning.learning_rate <= 0.0 {
            return Err(AgentError::ConfigError(
                "learning_rate must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.learning.gamma) {
            return Err(AgentError::ConfigError(
                "gamma must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.learning.similar_limit == 0 || self.learning.suggestion_limit == 0 {
            return Err(AgentError::ConfigError(
                "similar_limit and suggestion_limit must be greater than 0".to_string(),
            ));
        }

        let supported = self.supported_languages()?;
        let default = Language::parse(&self.language.default).ok_or_else(|| {
            AgentError::ConfigError(format!("Unknown default language: {}", self.language.default))
        })?;
        if !supported.contains(&default) {
            return Err(AgentError::ConfigError(format!(
                "Default language {} is not in the supported list",
                default
            )));
        }

        if Personality::parse(&self.personality.default).is_none() {
            return Err(AgentError::ConfigError(format!(
                "Unknown personality: {}",
                self.personality.default
            )));
        }

        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(AgentError::ConfigError(format!(
                    "Invalid log level: {}",
                    self.logging.level
                )))
            }
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| AgentError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AgentError::ConfigError(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| AgentError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get Ollama base URL
    pub fn ollama_url(&self) -> String {
        format!("http://{}:{}", self.ollama.host, self.ollama.port)
    }

    /// Coordinator settings from the `[learning]` section
    pub fn learning_settings(&self) -> LearningSettings {
        LearningSettings {
            epsilon: self.learning.epsilon,
            learning_rate: self.learning.learning_rate,
            gamma: self.learning.gamma,
            similar_limit: self.learning.similar_limit,
            suggestion_limit: self.learning.suggestion_limit,
        }
    }

    /// Default conversation language; unknown names fall back to English
    pub fn default_language(&self) -> Language {
        Language::parse_or(&self.language.default, Language::English)
    }

    /// Default persona; unknown ids fall back to the default assistant
    pub fn default_personality(&self) -> Personality {
        Personality::parse(&self.personality.default).unwrap_or_default()
    }

    /// Parsed supported languages, deduplicated in configured order
    pub fn supported_languages(&self) -> Result<Vec<Language>> {
        let mut languages = Vec::with_capacity(self.language.supported.len());
        for name in &self.language.supported {
            let language = Language::parse(name)
                .ok_or_else(|| AgentError::ConfigError(format!("Unknown language: {}", name)))?;
            if !languages.contains(&language) {
                languages.push(language);
            }
        }

        if languages.is_empty() {
            return Err(AgentError::ConfigError(
                "At least one supported language is required".to_string(),
            ));
        }

        Ok(languages)
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn database_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.database)
    }

    pub fn log_dir(&self) -> PathBuf {
        Self::expand_path(&self.paths.log_dir)
    }

    pub fn chat_log_path(&self) -> PathBuf {
        Self::expand_path(&self.paths.chat_log)
    }
}
