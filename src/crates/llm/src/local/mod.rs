//! Local LLM provider implementations.
//!
//! These providers run on localhost or the local network and need no API
//! key.
//!
//! # Providers
//!
//! - **Ollama** - Local runner for vision models such as LLaVA

pub mod ollama;

pub use ollama::OllamaClient;
