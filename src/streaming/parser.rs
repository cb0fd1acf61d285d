//! Incremental NDJSON decoder for Ollama generate streams
//!
//! Ollama sends one JSON object per line. Network chunks split lines at
//! arbitrary byte offsets, so bytes are buffered until a newline arrives:
//! - Buffer: 1MB maximum for a single unterminated line
//! - Blank lines are skipped
//! - Malformed lines are reported, not fatal to the stream

use crate::errors::{AgentError, Result};
use serde::Deserialize;

/// Maximum buffer size (1MB)
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// One line of a `/api/generate` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

/// Outcome of decoding one complete line
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedLine {
    Chunk(GenerateChunk),
    Malformed(String),
}

/// Line-buffering chunk decoder
#[derive(Debug)]
pub struct ChunkParser {
    /// Bytes of the current unterminated line
    buffer: Vec<u8>,

    /// Maximum buffer size
    max_buffer_size: usize,
}

impl ChunkParser {
    /// Create new parser with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create parser with custom buffer capacity
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
        }
    }

    /// Add bytes and decode every line they complete
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<Vec<DecodedLine>> {
        let mut decoded = Vec::new();

        for &byte in bytes {
            if byte == b'\n' {
                let line = std::mem::take(&mut self.buffer);
                if let Some(item) = decode_line(&line) {
                    decoded.push(item);
                }
                continue;
            }

            if self.buffer.len() >= self.max_buffer_size {
                return Err(AgentError::JsonParseError(format!(
                    "Buffer overflow: line exceeds maximum {} bytes",
                    self.max_buffer_size
                )));
            }
            self.buffer.push(byte);
        }

        Ok(decoded)
    }

    /// Decode whatever remains once the stream has ended
    pub fn finish(&mut self) -> Option<DecodedLine> {
        let line = std::mem::take(&mut self.buffer);
        decode_line(&line)
    }

    /// Get current buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for ChunkParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_line(line: &[u8]) -> Option<DecodedLine> {
    let text = String::from_utf8_lossy(line);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Some(match serde_json::from_str::<GenerateChunk>(text) {
        Ok(chunk) => DecodedLine::Chunk(chunk),
        Err(_) => DecodedLine::Malformed(text.to_string()),
    })
}
