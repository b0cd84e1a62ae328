//! Anthropic Claude client implementation.
//!
//! Provides integration with Anthropic's Messages API. All Claude 3 and
//! later models accept image content blocks.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::ClaudeClient;
//! use llm::config::RemoteLlmConfig;
//!
//! let config = RemoteLlmConfig::from_env(
//!     "ANTHROPIC_API_KEY",
//!     "https://api.anthropic.com",
//!     "claude-3-5-sonnet-latest"
//! )?;
//! let client = ClaudeClient::new(config)?;
//! ```

use crate::chat::{ChatModel, ChatRequest, ChatResponse, UsageMetadata};
use crate::config::{http_client, RemoteLlmConfig};
use crate::error::{LlmError, Result};
use crate::messages::{ContentPart, ImageSource, Message, MessageContent, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: usize = 4096;

/// Anthropic Claude API client.
#[derive(Clone)]
pub struct ClaudeClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl ClaudeClient {
    /// Create a new Claude client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    /// Convert messages to Claude format.
    /// Claude requires system messages to be separate from conversation messages.
    fn convert_messages(&self, messages: &[Message]) -> (Option<String>, Vec<ClaudeMessage>) {
        let mut system_prompt: Option<String> = None;
        let mut claude_messages = Vec::new();

        for msg in messages {
            let role = match msg.role {
                MessageRole::System => {
                    let content = msg.text();
                    system_prompt = Some(match system_prompt {
                        Some(existing) => format!("{}\n\n{}", existing, content),
                        None => content,
                    });
                    continue;
                }
                MessageRole::Human => "user",
                MessageRole::Assistant => "assistant",
            };

            let content = match &msg.content {
                MessageContent::Text(text) => ClaudeContent::Text(text.clone()),
                MessageContent::Parts(parts) => {
                    ClaudeContent::Blocks(parts.iter().map(convert_part).collect())
                }
            };

            claude_messages.push(ClaudeMessage {
                role: role.to_string(),
                content,
            });
        }

        (system_prompt, claude_messages)
    }

    fn build_body(&self, request: &ChatRequest) -> ClaudeRequest {
        let (system, messages) = self.convert_messages(&request.messages);
        ClaudeRequest {
            model: self.config.model.clone(),
            messages,
            system,
            max_tokens: request.config.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.config.temperature,
            top_p: request.config.top_p,
            stream: false,
        }
    }

    /// Convert Claude response to ChatResponse.
    fn convert_response(&self, claude_resp: ClaudeResponse) -> ChatResponse {
        let content_text = claude_resp
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .filter_map(|c| c.text.as_deref())
            .collect::<Vec<_>>()
            .join("");

        let mut metadata = HashMap::new();
        metadata.insert("id".to_string(), serde_json::Value::String(claude_resp.id));
        metadata.insert(
            "model".to_string(),
            serde_json::Value::String(claude_resp.model),
        );
        metadata.insert(
            "stop_reason".to_string(),
            serde_json::Value::String(claude_resp.stop_reason.unwrap_or_default()),
        );

        ChatResponse {
            message: Message::assistant(content_text),
            usage: Some(UsageMetadata::new(
                claude_resp.usage.input_tokens,
                claude_resp.usage.output_tokens,
            )),
            metadata,
        }
    }
}

fn convert_part(part: &ContentPart) -> ClaudeBlock {
    match part {
        ContentPart::Text { text } => ClaudeBlock::Text { text: text.clone() },
        ContentPart::Image { source } => ClaudeBlock::Image {
            source: match source {
                ImageSource::Base64 { media_type, data } => ClaudeImageSource::Base64 {
                    media_type: media_type.clone(),
                    data: data.clone(),
                },
                ImageSource::Url { url } => ClaudeImageSource::Url { url: url.clone() },
            },
        },
    }
}

#[async_trait]
impl ChatModel for ClaudeClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));
        let req_body = self.build_body(&request);

        debug!(model = %self.config.model, messages = req_body.messages.len(), "sending Claude messages request");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&req_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Claude", status, error_text));
        }

        let claude_resp: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(self.convert_response(claude_resp))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Claude API types
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    messages: Vec<ClaudeMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: ClaudeContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ClaudeContent {
    Text(String),
    Blocks(Vec<ClaudeBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClaudeBlock {
    Text { text: String },
    Image { source: ClaudeImageSource },
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClaudeImageSource {
    Base64 { media_type: String, data: String },
    Url { url: String },
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    id: String,
    model: String,
    content: Vec<ClaudeResponseBlock>,
    stop_reason: Option<String>,
    usage: ClaudeUsage,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponseBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeUsage {
    input_tokens: usize,
    output_tokens: usize,
}
