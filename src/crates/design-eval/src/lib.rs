//! Graphic design evaluation with vision-capable LLMs.
//!
//! A [`GraphicDesignEvaluator`] sends one rasterized design plus a
//! principle-specific prompt to any [`llm::ChatModel`] and parses the reply
//! into an [`EvaluationResult`] (a 1-10 score and an explanation).
//!
//! # Design principles
//!
//! - **alignment** - horizontal/vertical alignment and alignment groups
//! - **overlap** - text/graphic overlap, contrast, elements past the boundary
//! - **whitespace** - negative space, spacing and margins
//!
//! A caller-written instruction can replace the built-in one per call, and
//! the outer system prompt is a template with a `{design_principle}` slot.
//!
//! # Example
//!
//! ```rust,ignore
//! use design_eval::{DesignImage, DesignPrinciple, EvaluateOptions, GraphicDesignEvaluator};
//! use llm::remote::OpenAiClient;
//! use llm::RemoteLlmConfig;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env("OPENAI_API_KEY", "https://api.openai.com/v1", "gpt-4o")?;
//!     let evaluator = GraphicDesignEvaluator::new(Arc::new(OpenAiClient::new(config)?));
//!
//!     let image = DesignImage::open("poster.png")?;
//!     let result = evaluator.evaluate_principle(&image, DesignPrinciple::Alignment).await?;
//!     println!("{}", result);
//!
//!     let custom = EvaluateOptions::custom_prompt("Judge the hierarchy of headings.");
//!     let result = evaluator.evaluate(&image, custom).await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod evaluator;
pub mod parse;
pub mod payload;
pub mod principle;
pub mod prompts;
pub mod result;
pub mod template;

pub use config::{load_config, AppConfig, EvaluatorConfig, ProviderConfig, ProviderKind};
pub use error::{EvalError, Result};
pub use evaluator::{EvaluateOptions, GraphicDesignEvaluator};
pub use parse::{parse_evaluation, parse_relative_evaluation};
pub use payload::DesignImage;
pub use principle::DesignPrinciple;
pub use prompts::{PromptOverrides, PromptStore};
pub use result::{BetterDesign, EvaluationResult, RelativeEvaluationResult};
pub use template::SystemPromptTemplate;
