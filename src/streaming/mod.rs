//! Streaming client module
//!
//! Provides the Ollama API client and the incremental NDJSON decoder.

pub mod client;
pub mod parser;

// Re-export commonly used types
pub use client::{collect_chunks, GenerateOptions, OllamaClient, DEFAULT_MODEL, DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT};
pub use parser::{ChunkParser, DecodedLine, GenerateChunk, MAX_BUFFER_SIZE};
