//! Remote LLM provider implementations.
//!
//! These providers require API keys and talk to hosted vision models.
//!
//! # Providers
//!
//! - **Claude** - Anthropic's Claude models (Messages API)
//! - **OpenAI** - OpenAI models and any `/chat/completions`-compatible server

pub mod claude;
pub mod openai;

pub use claude::ClaudeClient;
pub use openai::OpenAiClient;
