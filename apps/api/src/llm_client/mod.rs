/// LLM Client: the single point of entry for all text-completion calls.
///
/// ARCHITECTURAL RULE: No other module may call the completion endpoint directly.
/// Generation code depends on the `TextCompletion` trait, which this client implements.
///
/// Speaks the OpenAI-compatible chat completions protocol with `stream: true`
/// and assembles the SSE token stream into a single string.
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
pub const DEFAULT_MODEL: &str = "google/gemma-3-1b-it";
const TEMPERATURE: f32 = 0.1;
const TOP_P: f32 = 0.7;
const MAX_TOKENS: u32 = 512;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No valid API key provided for content generation.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid API key or authentication error.")]
    Unauthorized,

    #[error("API rate limit reached. Please try again later.")]
    RateLimited,

    #[error("API service is currently unavailable. Please try again later.")]
    Unavailable,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed stream chunk: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => LlmError::Unauthorized,
            429 => LlmError::RateLimited,
            503 => LlmError::Unavailable,
            _ => LlmError::Api { status, message },
        }
    }
}

/// A remote capability that turns a prompt into free text.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    content: Option<String>,
}

/// One decoded SSE line.
#[derive(Debug, PartialEq)]
enum SseEvent {
    Content(String),
    Done,
    Skip,
}

fn parse_sse_line(line: &str) -> Result<SseEvent, LlmError> {
    let Some(data) = line.trim_end_matches('\r').strip_prefix("data:") else {
        return Ok(SseEvent::Skip);
    };
    let data = data.trim();
    if data == "[DONE]" {
        return Ok(SseEvent::Done);
    }
    if data.is_empty() {
        return Ok(SseEvent::Skip);
    }

    let chunk: StreamChunk = serde_json::from_str(data)?;
    let text: String = chunk
        .choices
        .into_iter()
        .filter_map(|c| c.delta.content)
        .collect();
    Ok(SseEvent::Content(text))
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .unwrap_or_default(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends the prompt and collects the streamed reply.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn call(&self, prompt: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
            top_p: TOP_P,
            max_tokens: MAX_TOKENS,
            stream: true,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(self.completions_url())
                .bearer_auth(api_key)
                .header("accept", "text/event-stream")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::from_status(status.as_u16(), body));
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(LlmError::from_status(status.as_u16(), body));
            }

            let text = collect_stream(response).await?;
            debug!("LLM call succeeded: {} chars", text.len());

            if text.trim().is_empty() {
                return Err(LlmError::EmptyContent);
            }
            return Ok(text);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited))
    }
}

#[async_trait]
impl TextCompletion for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.call(prompt).await
    }
}

/// Accumulates raw body bytes and yields complete SSE lines. Lines are only
/// decoded once their terminating newline arrives, so a multi-byte character
/// split across network chunks survives intact.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(bytes);

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            lines.push(String::from_utf8_lossy(&line[..pos]).into_owned());
        }
        lines
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.pending).into_owned()
    }
}

/// Reads an SSE body to completion.
async fn collect_stream(response: reqwest::Response) -> Result<String, LlmError> {
    let mut stream = response.bytes_stream();
    let mut buffer = LineBuffer::default();
    let mut text = String::new();

    while let Some(chunk) = stream.next().await {
        for line in buffer.push(&chunk?) {
            match parse_sse_line(&line)? {
                SseEvent::Content(delta) => text.push_str(&delta),
                SseEvent::Done => return Ok(text),
                SseEvent::Skip => {}
            }
        }
    }

    if let SseEvent::Content(delta) = parse_sse_line(&buffer.finish())? {
        text.push_str(&delta);
    }
    Ok(text)
}
