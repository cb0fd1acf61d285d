//! Ollama API client
//!
//! Endpoint: POST /api/generate, either as one JSON reply or as a stream
//! of NDJSON chunks.

use super::parser::{ChunkParser, DecodedLine};
use crate::errors::{AgentError, Result};
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default model
pub const DEFAULT_MODEL: &str = "qwen2.5:7b-instruct";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Sampling options forwarded to Ollama
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<u32>,
}

/// Ollama client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaClient {
    /// Create new Ollama client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }

    /// Create Ollama client with custom configuration
    pub fn with_config(base_url: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AgentError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Single non-streaming completion; returns the `response` field
    pub async fn generate(&self, prompt: &str, options: Option<GenerateOptions>) -> Result<String> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        let response = self.post_generate(&request).await?;
        let body: GenerateReply = response
            .json()
            .await
            .map_err(|e| AgentError::OllamaApiError(format!("Failed to parse reply: {}", e)))?;

        Ok(body.response)
    }

    /// Streaming completion as raw byte chunks
    pub async fn generate_stream(
        &self,
        prompt: &str,
        options: Option<GenerateOptions>,
    ) -> Result<impl Stream<Item = Result<Vec<u8>>>> {
        let request = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: true,
            options,
        };

        let response = self.post_generate(&request).await?;
        let stream = response.bytes_stream().map(|result| {
            result
                .map(|bytes| bytes.to_vec())
                .map_err(|e| AgentError::StreamingError(e.to_string()))
        });

        Ok(stream)
    }

    /// Stream a completion and concatenate the chunks until `done`
    pub async fn generate_collected(&self, prompt: &str, options: Option<GenerateOptions>) -> Result<String> {
        let stream = self.generate_stream(prompt, options).await?;
        collect_chunks(stream).await
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/version", self.base_url);

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Get current model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post_generate(&self, request: &OllamaGenerateRequest<'_>) -> Result<reqwest::Response> {
        let url = format!("{}/api/generate", self.base_url);
        debug!(model = %self.model, stream = request.stream, "ollama generate");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AgentError::OllamaApiError(format!("Failed to send request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AgentError::OllamaApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

/// Drain an NDJSON byte stream into the concatenated, trimmed response
/// text. Stops at the first `done` chunk; malformed lines are skipped.
pub async fn collect_chunks<S>(stream: S) -> Result<String>
where
    S: Stream<Item = Result<Vec<u8>>>,
{
    futures_util::pin_mut!(stream);
    let mut parser = ChunkParser::new();
    let mut text = String::new();

    while let Some(bytes) = stream.next().await {
        for line in parser.add_bytes(&bytes?)? {
            if append_line(&mut text, line) {
                return Ok(text.trim().to_string());
            }
        }
    }

    if let Some(line) = parser.finish() {
        append_line(&mut text, line);
    }

    Ok(text.trim().to_string())
}

/// Returns true once the stream reports `done`
fn append_line(text: &mut String, line: DecodedLine) -> bool {
    match line {
        DecodedLine::Chunk(chunk) => {
            text.push_str(&chunk.response);
            chunk.done
        }
        DecodedLine::Malformed(raw) => {
            warn!(line = %raw, "skipping malformed stream line");
            false
        }
    }
}

/// Ollama generate request
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

/// Non-streaming generate reply
#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: String,
}
