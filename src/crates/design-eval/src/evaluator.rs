//! The evaluator: prompt resolution, one model call, reply parsing.

use crate::config::EvaluatorConfig;
use crate::error::{EvalError, Result};
use crate::parse::{parse_evaluation, parse_relative_evaluation};
use crate::payload::DesignImage;
use crate::principle::DesignPrinciple;
use crate::prompts::PromptStore;
use crate::result::{EvaluationResult, RelativeEvaluationResult};
use crate::template::SystemPromptTemplate;
use llm::{ChatModel, ChatRequest, ContentPart, Message};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-call choices for [`GraphicDesignEvaluator::evaluate`].
///
/// A custom `design_principle_prompt` takes precedence over
/// `design_principle`; at least one of them must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluateOptions {
    pub design_principle: Option<DesignPrinciple>,
    pub design_principle_prompt: Option<String>,
    pub system_prompt_template: Option<String>,
}

impl EvaluateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for one of the built-in principles.
    pub fn principle(principle: DesignPrinciple) -> Self {
        Self::new().with_principle(principle)
    }

    /// Options for a caller-written evaluative instruction.
    pub fn custom_prompt(prompt: impl Into<String>) -> Self {
        Self::new().with_principle_prompt(prompt)
    }

    pub fn with_principle(mut self, principle: DesignPrinciple) -> Self {
        self.design_principle = Some(principle);
        self
    }

    pub fn with_principle_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.design_principle_prompt = Some(prompt.into());
        self
    }

    pub fn with_system_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.system_prompt_template = Some(template.into());
        self
    }
}

/// Scores graphic designs by asking a vision-capable [`ChatModel`].
///
/// ```rust,ignore
/// let evaluator = GraphicDesignEvaluator::new(Arc::new(client));
/// let image = DesignImage::open("poster.png")?;
/// let result = evaluator.evaluate_principle(&image, DesignPrinciple::Whitespace).await?;
/// println!("{} - {}", result.score, result.explanation);
/// ```
///
/// The evaluator holds no mutable state. It can be shared across tasks as
/// far as the underlying client allows.
#[derive(Clone)]
pub struct GraphicDesignEvaluator {
    llm: Arc<dyn ChatModel>,
    prompts: Arc<PromptStore>,
    config: EvaluatorConfig,
}

impl GraphicDesignEvaluator {
    /// Evaluator with the built-in prompts and default settings.
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self {
            llm,
            prompts: Arc::new(PromptStore::default()),
            config: EvaluatorConfig::default(),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptStore) -> Self {
        self.prompts = Arc::new(prompts);
        self
    }

    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn prompts(&self) -> &PromptStore {
        &self.prompts
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Pick the evaluative instruction for a call.
    fn resolve_instruction<'a>(&'a self, options: &'a EvaluateOptions) -> Result<&'a str> {
        if let Some(prompt) = options.design_principle_prompt.as_deref() {
            if prompt.trim().is_empty() {
                return Err(EvalError::InvalidArgument(
                    "design_principle_prompt is empty".to_string(),
                ));
            }
            return Ok(prompt);
        }

        match options.design_principle {
            Some(principle) => Ok(self.prompts.get_principle_prompt(principle)),
            None => Err(EvalError::InvalidArgument(
                "either design_principle or design_principle_prompt is required".to_string(),
            )),
        }
    }

    /// Compose the system prompt for `options` against `default_template`.
    fn system_prompt(&self, options: &EvaluateOptions, default_template: &str) -> Result<String> {
        let instruction = self.resolve_instruction(options)?;
        let template = options
            .system_prompt_template
            .as_deref()
            .unwrap_or(default_template);

        Ok(SystemPromptTemplate::parse(template)?.render(instruction))
    }

    /// Build the single request [`evaluate`](Self::evaluate) would send.
    ///
    /// All argument and template errors surface here, before any model call.
    pub fn build_request(&self, image: &DesignImage, options: &EvaluateOptions) -> Result<ChatRequest> {
        let system = self.system_prompt(options, self.prompts.get_default_system_prompt())?;

        let request = ChatRequest::new(vec![
            Message::system(system),
            Message::human(vec![
                ContentPart::text(self.prompts.user_prompt()),
                image.content_part(),
            ]),
        ]);

        Ok(self.config.apply(request))
    }

    /// Build the pairwise request [`compare`](Self::compare) would send.
    pub fn build_relative_request(
        &self,
        image_a: &DesignImage,
        image_b: &DesignImage,
        options: &EvaluateOptions,
    ) -> Result<ChatRequest> {
        let system = self.system_prompt(options, self.prompts.relative_system_prompt())?;

        let request = ChatRequest::new(vec![
            Message::system(system),
            Message::human(vec![
                ContentPart::text(self.prompts.relative_user_prompt()),
                image_a.content_part(),
                image_b.content_part(),
            ]),
        ]);

        Ok(self.config.apply(request))
    }

    /// Score `image` against one design principle or a custom instruction.
    ///
    /// Sends exactly one request to the model. Client failures come back as
    /// [`EvalError::Upstream`] unchanged; a reply that is not a
    /// `{score, explanation}` object is [`EvalError::ResponseParse`].
    pub async fn evaluate(&self, image: &DesignImage, options: EvaluateOptions) -> Result<EvaluationResult> {
        let request = self.build_request(image, &options)?;

        debug!(
            model = self.llm.model_name(),
            principle = ?options.design_principle,
            custom_prompt = options.design_principle_prompt.is_some(),
            image_bytes = image.as_bytes().len(),
            "requesting design evaluation"
        );

        let response = self.llm.chat(request).await?;
        let reply = response.text();

        let result = parse_evaluation(&reply).map_err(|err| {
            warn!(model = self.llm.model_name(), error = %err, "unparseable evaluation reply");
            err
        })?;

        info!(
            model = self.llm.model_name(),
            principle = ?options.design_principle,
            score = result.score,
            "design evaluated"
        );
        Ok(result)
    }

    /// Shorthand for `evaluate(image, EvaluateOptions::principle(principle))`.
    pub async fn evaluate_principle(
        &self,
        image: &DesignImage,
        principle: DesignPrinciple,
    ) -> Result<EvaluationResult> {
        self.evaluate(image, EvaluateOptions::principle(principle)).await
    }

    /// Run `samples` independent evaluations of the same image, one after
    /// another, and return every result.
    ///
    /// Stops at the first failure.
    pub async fn sample(
        &self,
        image: &DesignImage,
        options: EvaluateOptions,
        samples: usize,
    ) -> Result<Vec<EvaluationResult>> {
        if samples == 0 {
            return Err(EvalError::InvalidArgument(
                "samples must be at least 1".to_string(),
            ));
        }

        // Validate once so a bad template fails before the first call.
        self.build_request(image, &options)?;

        let mut results = Vec::with_capacity(samples);
        for _ in 0..samples {
            results.push(self.evaluate(image, options.clone()).await?);
        }
        Ok(results)
    }

    /// Ask which of two designs better follows the principle.
    pub async fn compare(
        &self,
        image_a: &DesignImage,
        image_b: &DesignImage,
        options: EvaluateOptions,
    ) -> Result<RelativeEvaluationResult> {
        let request = self.build_relative_request(image_a, image_b, &options)?;

        debug!(
            model = self.llm.model_name(),
            principle = ?options.design_principle,
            "requesting pairwise design comparison"
        );

        let response = self.llm.chat(request).await?;
        let reply = response.text();

        let result = parse_relative_evaluation(&reply).map_err(|err| {
            warn!(model = self.llm.model_name(), error = %err, "unparseable comparison reply");
            err
        })?;

        info!(
            model = self.llm.model_name(),
            better = ?result.better_design,
            "designs compared"
        );
        Ok(result)
    }

    /// Run `samples` independent pairwise comparisons, one after another.
    ///
    /// Stops at the first failure.
    pub async fn compare_samples(
        &self,
        image_a: &DesignImage,
        image_b: &DesignImage,
        options: EvaluateOptions,
        samples: usize,
    ) -> Result<Vec<RelativeEvaluationResult>> {
        if samples == 0 {
            return Err(EvalError::InvalidArgument(
                "samples must be at least 1".to_string(),
            ));
        }

        self.build_relative_request(image_a, image_b, &options)?;

        let mut results = Vec::with_capacity(samples);
        for _ in 0..samples {
            results.push(self.compare(image_a, image_b, options.clone()).await?);
        }
        Ok(results)
    }
}

impl std::fmt::Debug for GraphicDesignEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicDesignEvaluator")
            .field("model", &self.llm.model_name())
            .field("config", &self.config)
            .finish()
    }
}
