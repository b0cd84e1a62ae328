//! Ollama client implementation.
//!
//! Provides integration with Ollama, a popular local LLM runner. Image
//! requests need a vision model such as `llava`, `llama3.2-vision` or
//! `qwen2.5vl`.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::local::OllamaClient;
//! use llm::config::LocalLlmConfig;
//!
//! let config = LocalLlmConfig::new("http://localhost:11434", "llava");
//! let client = OllamaClient::new(config)?;
//! ```

use crate::chat::{ChatModel, ChatRequest, ChatResponse, UsageMetadata};
use crate::config::{http_client, LocalLlmConfig};
use crate::error::{LlmError, Result};
use crate::messages::{ImageSource, Message, MessageRole};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ollama client for local LLM inference.
#[derive(Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    /// Create a new Ollama client with the given configuration.
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = http_client(config.timeout)?;
        Ok(Self { config, client })
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Check if Ollama server is running.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url());
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    /// Convert a message to Ollama message format.
    ///
    /// Ollama only takes inline base64 images; URL sources are rejected.
    fn convert_message(&self, msg: &Message) -> Result<OllamaMessage> {
        let images = msg
            .images()
            .map(|source| match source {
                ImageSource::Base64 { data, .. } => Ok(data.clone()),
                ImageSource::Url { url } => Err(LlmError::InvalidRequest(format!(
                    "Ollama does not fetch image URLs: {}",
                    url
                ))),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(OllamaMessage {
            role: match msg.role {
                MessageRole::System => "system".to_string(),
                MessageRole::Human => "user".to_string(),
                MessageRole::Assistant => "assistant".to_string(),
            },
            content: msg.text(),
            images: if images.is_empty() { None } else { Some(images) },
        })
    }

    fn build_body(&self, request: &ChatRequest) -> Result<OllamaRequest> {
        let messages = request
            .messages
            .iter()
            .map(|m| self.convert_message(m))
            .collect::<Result<Vec<_>>>()?;

        let mut options = HashMap::new();
        if let Some(temp) = request.config.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }
        if let Some(top_p) = request.config.top_p {
            options.insert("top_p", serde_json::Value::from(top_p));
        }
        if let Some(max_tokens) = request.config.max_tokens {
            options.insert("num_predict", serde_json::Value::from(max_tokens));
        }

        Ok(OllamaRequest {
            model: self.config.model.clone(),
            messages,
            stream: false,
            format: request.config.json_response.then(|| "json".to_string()),
            options: if options.is_empty() {
                None
            } else {
                Some(options)
            },
        })
    }

    /// Convert Ollama response to ChatResponse.
    fn convert_response(&self, ollama_resp: OllamaResponse) -> ChatResponse {
        let usage = if ollama_resp.prompt_eval_count.is_some() || ollama_resp.eval_count.is_some()
        {
            Some(UsageMetadata::new(
                ollama_resp.prompt_eval_count.unwrap_or(0),
                ollama_resp.eval_count.unwrap_or(0),
            ))
        } else {
            None
        };

        let mut metadata = HashMap::new();
        metadata.insert(
            "model".to_string(),
            serde_json::Value::String(ollama_resp.model),
        );
        if let Some(total_duration) = ollama_resp.total_duration {
            metadata.insert(
                "total_duration_ns".to_string(),
                serde_json::Value::Number(total_duration.into()),
            );
        }

        ChatResponse {
            message: Message::assistant(ollama_resp.message.content),
            usage,
            metadata,
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.base_url());
        let req_body = self.build_body(&request)?;

        debug!(model = %self.config.model, messages = req_body.messages.len(), "sending Ollama chat request");

        let response = self.client.post(&url).json(&req_body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Ollama", status, error_text));
        }

        let ollama_resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(self.convert_response(ollama_resp))
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(self.check_health().await)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}
