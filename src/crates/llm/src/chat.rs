//! Core chat abstraction.
//!
//! [`ChatModel`] is the single seam between callers and a concrete LLM
//! provider: it takes a [`ChatRequest`] (messages plus generation settings)
//! and returns the generated text as a [`ChatResponse`]. Providers live in
//! [`crate::remote`] and [`crate::local`]; tests implement the trait with a
//! canned reply.
//!
//! # Example Implementation
//!
//! ```rust,ignore
//! use llm::{ChatModel, ChatRequest, ChatResponse, Message, Result};
//! use async_trait::async_trait;
//!
//! struct Canned(String);
//!
//! #[async_trait]
//! impl ChatModel for Canned {
//!     async fn chat(&self, _request: ChatRequest) -> Result<ChatResponse> {
//!         Ok(ChatResponse::new(Message::assistant(self.0.clone())))
//!     }
//! }
//! ```

use crate::error::Result;
use crate::messages::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A request to a chat model containing messages and configuration.
///
/// ```rust,ignore
/// let request = ChatRequest::new(vec![
///     Message::system("You are a design critic"),
///     Message::human("Score this layout"),
/// ])
/// .with_temperature(0.0)
/// .with_json_response(true);
/// ```
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// The conversation messages to send to the model.
    pub messages: Vec<Message>,

    /// Generation settings.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with default configuration.
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Set top-p (nucleus) sampling.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = Some(top_p);
        self
    }

    /// Ask the provider to constrain output to a JSON object, where supported.
    pub fn with_json_response(mut self, enabled: bool) -> Self {
        self.config.json_response = enabled;
        self
    }

    /// The first system message, if any.
    pub fn system_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .find(|m| m.role == crate::messages::MessageRole::System)
    }
}

/// Configuration parameters for chat generation.
///
/// Not all providers honor every field; adapters ignore what they cannot map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    /// Sampling temperature (provider-dependent range).
    pub temperature: Option<f32>,

    /// Maximum tokens to generate.
    pub max_tokens: Option<usize>,

    /// Top-p (nucleus) sampling parameter (0.0-1.0).
    pub top_p: Option<f32>,

    /// Request a JSON-object response format.
    pub json_response: bool,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// A complete response from a chat model.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// The assistant message.
    pub message: Message,

    /// Token usage, when the provider reports it.
    pub usage: Option<UsageMetadata>,

    /// Provider-specific extras (model id, finish reason, ...).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatResponse {
    /// Wrap a message with no usage or metadata.
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
            metadata: HashMap::new(),
        }
    }

    /// The generated text.
    pub fn text(&self) -> String {
        self.message.text()
    }
}

/// Core trait for chat-based language models.
///
/// Implementations convert messages (including image parts) into their
/// provider's wire format, perform exactly one request per `chat` call, and
/// return the generated text. Retries, timeouts and concurrency limits belong
/// to the implementation, not to callers of this trait.
///
/// Implementations must be `Send + Sync`; share them as `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete chat response from messages.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Check if the model/provider is available and healthy.
    ///
    /// Default implementation returns `Ok(true)`, assuming availability.
    async fn is_available(&self) -> Result<bool> {
        Ok(true)
    }

    /// Identifier of the model behind this client, for logging.
    fn model_name(&self) -> &str {
        "unknown"
    }
}
