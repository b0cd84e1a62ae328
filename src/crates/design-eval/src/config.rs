//! Configuration for evaluators and the LLM provider behind them.
//!
//! ```toml
//! prompts = "prompts.yaml"        # optional, relative to this file
//!
//! [provider]
//! provider = "openai"             # openai | anthropic | ollama
//! model = "gpt-4o"
//! api_key_env = "OPENAI_API_KEY"  # or api_key = "..."
//! timeout_secs = 60
//!
//! [evaluator]
//! temperature = 0.0
//! max_tokens = 1024
//! json_response = true
//! ```

use crate::error::{EvalError, Result};
use crate::prompts::PromptStore;
use llm::local::OllamaClient;
use llm::remote::{ClaudeClient, OpenAiClient};
use llm::{ChatModel, ChatRequest, LocalLlmConfig, RemoteLlmConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Generation settings applied to every request an evaluator sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Sampling temperature; provider default when unset.
    pub temperature: Option<f32>,

    /// Cap on generated tokens.
    pub max_tokens: Option<usize>,

    /// Ask the provider for JSON-object output where it supports that.
    pub json_response: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            temperature: None,
            max_tokens: Some(1024),
            json_response: true,
        }
    }
}

impl EvaluatorConfig {
    /// Copy these settings onto a request.
    pub fn apply(&self, mut request: ChatRequest) -> ChatRequest {
        if let Some(temperature) = self.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request.with_json_response(self.json_response)
    }
}

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[serde(alias = "open_ai")]
    OpenAi,
    #[serde(alias = "claude")]
    Anthropic,
    Ollama,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Ollama => None,
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "openai" | "open_ai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(EvalError::Config(format!("unknown provider '{}'", other))),
        }
    }
}

/// Which provider to talk to and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,

    pub model: String,

    /// Literal API key. Takes precedence over `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Environment variable holding the API key. Defaults per provider.
    #[serde(default)]
    pub api_key_env: Option<String>,

    /// Override the provider's default endpoint.
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    60
}

impl ProviderConfig {
    pub fn new(provider: ProviderKind, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key: None,
            api_key_env: None,
            base_url: None,
            timeout_secs: default_timeout_secs(),
        }
    }

    fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }

    fn remote_config(&self) -> Result<RemoteLlmConfig> {
        let timeout = Duration::from_secs(self.timeout_secs);
        let config = match (&self.api_key, &self.api_key_env) {
            (Some(key), _) => RemoteLlmConfig::new(key.clone(), self.base_url(), &self.model),
            (None, Some(var)) => RemoteLlmConfig::from_env(var, self.base_url(), &self.model)?,
            (None, None) => {
                let var = self.provider.default_api_key_env().ok_or_else(|| {
                    EvalError::Config(format!("{:?} needs an API key", self.provider))
                })?;
                RemoteLlmConfig::from_env(var, self.base_url(), &self.model)?
            }
        };
        Ok(config.with_timeout(timeout))
    }

    /// Construct the adapter for this provider.
    pub fn build_client(&self) -> Result<Arc<dyn ChatModel>> {
        debug!(provider = ?self.provider, model = %self.model, "building LLM client");

        let client: Arc<dyn ChatModel> = match self.provider {
            ProviderKind::OpenAi => Arc::new(OpenAiClient::new(self.remote_config()?)?),
            ProviderKind::Anthropic => Arc::new(ClaudeClient::new(self.remote_config()?)?),
            ProviderKind::Ollama => {
                let config = LocalLlmConfig::new(self.base_url(), &self.model)
                    .with_timeout(Duration::from_secs(self.timeout_secs));
                Arc::new(OllamaClient::new(config)?)
            }
        };
        Ok(client)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub provider: ProviderConfig,

    #[serde(default)]
    pub evaluator: EvaluatorConfig,

    /// Prompt override file (YAML, JSON or TOML).
    #[serde(default)]
    pub prompts: Option<PathBuf>,
}

impl AppConfig {
    /// The prompt store described by this config.
    pub fn prompt_store(&self) -> Result<PromptStore> {
        match &self.prompts {
            Some(path) => PromptStore::from_file(path),
            None => Ok(PromptStore::default()),
        }
    }
}

/// Load an [`AppConfig`] from a TOML file.
///
/// A relative `prompts` path is resolved against the config file's directory.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| EvalError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let mut config: AppConfig = toml::from_str(&content)?;

    if let (Some(prompts), Some(dir)) = (&config.prompts, path.parent()) {
        if prompts.is_relative() {
            config.prompts = Some(dir.join(prompts));
        }
    }

    debug!(path = %path.display(), provider = ?config.provider.provider, "loaded config");
    Ok(config)
}
