//! LLM provider implementations with multimodal (text + image) messages.
//!
//! This crate defines the [`ChatModel`] trait, the message types it carries,
//! and concrete adapters for local and remote providers. Callers depend on
//! `Arc<dyn ChatModel>` and pick an adapter at startup.
//!
//! # Local Providers
//!
//! - **Ollama** - local vision models (`llava`, `llama3.2-vision`, ...)
//!
//! # Remote Providers
//!
//! - **OpenAI** - GPT-4o family and OpenAI-compatible servers
//! - **Claude** - Anthropic's Claude models
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::config::RemoteLlmConfig;
//! use llm::{ChatModel, ChatRequest, ContentPart, Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "OPENAI_API_KEY",
//!         "https://api.openai.com/v1",
//!         "gpt-4o"
//!     )?;
//!     let client = OpenAiClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![
//!         Message::system("Describe the image."),
//!         Message::human(vec![ContentPart::image_url("https://example.com/poster.png")]),
//!     ]);
//!
//!     let response = client.chat(request).await?;
//!     println!("Response: {}", response.text());
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;
pub mod messages;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

// Re-export commonly used types
pub use chat::{ChatConfig, ChatModel, ChatRequest, ChatResponse, UsageMetadata};
pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
pub use messages::{ContentPart, ImageSource, Message, MessageContent, MessageRole};
