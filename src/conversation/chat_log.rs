//! Append-only JSONL log of chat turns

use crate::emotion::{Emotion, Language};
use crate::errors::{AgentError, Result};
use crate::generation::Personality;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One logged turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatLogEntry {
    pub timestamp: DateTime<Utc>,
    pub session_id: Uuid,
    pub language: Language,
    /// Persona active for the turn; older lines predate it
    #[serde(default)]
    pub personality: Personality,
    pub user_input: String,
    pub emotions_detected: Vec<Emotion>,
    pub response: String,
    /// Reply came from memory instead of the model
    pub used_suggestion: bool,
    pub learning_enabled: bool,
}

/// JSONL chat log on disk
#[derive(Debug, Clone)]
pub struct ChatLog {
    path: PathBuf,
}

impl ChatLog {
    /// Open (or prepare to create) the log, creating parent directories
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry as a single line
    pub fn append(&self, entry: &ChatLogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    /// Every entry in file order; a missing file reads as empty
    pub fn entries(&self) -> Result<Vec<ChatLogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)?;
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<ChatLogEntry>(line).map_err(AgentError::from))
            .collect()
    }
}
